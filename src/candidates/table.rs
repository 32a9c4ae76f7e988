//! Local outcode table: `outcode,latitude,longitude` rows.

use csv::{ReaderBuilder, Trim};
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::models::Candidate;

/// Header names of the label and coordinate columns
#[derive(Debug, Clone)]
pub struct TableColumns {
    pub label: String,
    pub latitude: String,
    pub longitude: String,
}

impl Default for TableColumns {
    fn default() -> Self {
        Self {
            label: "outcode".to_string(),
            latitude: "latitude".to_string(),
            longitude: "longitude".to_string(),
        }
    }
}

/// Open a CSV file, decoding it on the fly when it ends in `.gz`
pub(crate) fn open_csv(path: &Path) -> Result<Box<dyn Read>> {
    let file = File::open(path)?;
    if path.extension().map_or(false, |e| e == "gz") {
        Ok(Box::new(GzDecoder::new(file)))
    } else {
        Ok(Box::new(file))
    }
}

pub(crate) fn column_index(headers: &csv::StringRecord, name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| Error::InvalidInput(format!("table is missing column '{}'", name)))
}

/// Every row of a precomputed table, returned regardless of distance
#[derive(Debug, Clone, Default)]
pub struct TableSupplier {
    candidates: Vec<Candidate>,
}

impl TableSupplier {
    pub fn load(path: &Path, columns: &TableColumns) -> Result<Self> {
        info!("Loading candidate table from {}", path.display());
        let supplier = Self::from_reader(open_csv(path)?, columns)?;
        info!("Loaded {} candidates", supplier.len());
        Ok(supplier)
    }

    pub fn from_reader<R: Read>(reader: R, columns: &TableColumns) -> Result<Self> {
        let mut csv_reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        let label_idx = column_index(&headers, &columns.label)?;
        let lat_idx = column_index(&headers, &columns.latitude)?;
        let lon_idx = column_index(&headers, &columns.longitude)?;

        let mut candidates = Vec::new();
        let mut unlabelled = 0usize;

        for result in csv_reader.records() {
            let record = result?;
            let label = record.get(label_idx).unwrap_or("");
            if label.is_empty() {
                unlabelled += 1;
                continue;
            }

            candidates.push(Candidate::from_text(
                label,
                record.get(lat_idx).unwrap_or(""),
                record.get(lon_idx).unwrap_or(""),
            ));
        }

        if unlabelled > 0 {
            debug!("Skipped {} table rows without a label", unlabelled);
        }

        Ok(Self { candidates })
    }

    pub fn rows(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}
