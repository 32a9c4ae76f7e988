//! Build the outcode table from an ONS Postcode Directory export.

use csv::{ReaderBuilder, Trim, Writer};
use hashbrown::HashMap;
use serde::Serialize;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tracing::info;

use super::table::{column_index, open_csv};
use crate::error::Result;
use crate::models::GeoPoint;
use crate::postcodes::outcode_of;

/// Column names in the postcode directory
#[derive(Debug, Clone)]
pub struct DirectoryColumns {
    pub postcode: String,
    pub latitude: String,
    pub longitude: String,
}

impl Default for DirectoryColumns {
    fn default() -> Self {
        Self {
            postcode: "PCD8".to_string(),
            latitude: "LAT".to_string(),
            longitude: "LONG".to_string(),
        }
    }
}

/// One row of the generated table: the mean position of an outcode's postcodes
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutcodeRow {
    pub outcode: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Default)]
struct Accumulator {
    lat: f64,
    lon: f64,
    count: u64,
}

/// Average postcode coordinates per outcode, sorted by outcode.
///
/// Rows without a usable position are left out of the averages.
pub fn aggregate_outcodes<R: Read>(reader: R, columns: &DirectoryColumns) -> Result<Vec<OutcodeRow>> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::Headers)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let postcode_idx = column_index(&headers, &columns.postcode)?;
    let lat_idx = column_index(&headers, &columns.latitude)?;
    let lon_idx = column_index(&headers, &columns.longitude)?;

    let mut sums: HashMap<String, Accumulator> = HashMap::new();
    let mut total = 0u64;
    let mut skipped = 0u64;

    for result in csv_reader.records() {
        let record = result?;
        total += 1;

        let outcode = match record.get(postcode_idx).and_then(outcode_of) {
            Some(o) => o.to_ascii_uppercase(),
            None => {
                skipped += 1;
                continue;
            }
        };

        let point = match GeoPoint::parse(
            record.get(lat_idx).unwrap_or(""),
            record.get(lon_idx).unwrap_or(""),
        ) {
            Some(p) => p,
            None => {
                skipped += 1;
                continue;
            }
        };

        let acc = sums.entry(outcode).or_default();
        acc.lat += point.lat();
        acc.lon += point.lon();
        acc.count += 1;
    }

    let mut rows: Vec<OutcodeRow> = sums
        .into_iter()
        .map(|(outcode, acc)| OutcodeRow {
            outcode,
            latitude: acc.lat / acc.count as f64,
            longitude: acc.lon / acc.count as f64,
        })
        .collect();
    rows.sort_by(|a, b| a.outcode.cmp(&b.outcode));

    info!(
        "Aggregated {} postcodes into {} outcodes ({} rows skipped)",
        total - skipped,
        rows.len(),
        skipped
    );

    Ok(rows)
}

/// Write rows as `outcode,latitude,longitude`
pub fn write_outcode_table<W: Write>(rows: &[OutcodeRow], writer: W) -> Result<()> {
    let mut csv_writer = Writer::from_writer(writer);
    for row in rows {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Read a postcode directory (optionally gzipped) and write the outcode table
pub fn build_outcode_table(input: &Path, output: &Path, columns: &DirectoryColumns) -> Result<usize> {
    info!("Reading postcode directory {}", input.display());
    let rows = aggregate_outcodes(open_csv(input)?, columns)?;

    let file = File::create(output)?;
    write_outcode_table(&rows, file)?;
    info!("Wrote {} outcodes to {}", rows.len(), output.display());

    Ok(rows.len())
}
