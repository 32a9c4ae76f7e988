use serde::Serialize;
use serde_json::Value;

use super::GeoPoint;

/// A labelled point that may or may not be reachable.
///
/// `location` is `None` when the upstream row had a missing, non-numeric or
/// out-of-range coordinate. Such candidates are skipped by the filter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Candidate {
    pub label: String,
    pub location: Option<GeoPoint>,
}

impl Candidate {
    pub fn new(label: impl Into<String>, location: GeoPoint) -> Self {
        Self {
            label: label.into(),
            location: Some(location),
        }
    }

    pub fn unlocated(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            location: None,
        }
    }

    /// Build from text fields (CSV rows)
    pub fn from_text(label: impl Into<String>, lat: &str, lon: &str) -> Self {
        Self {
            label: label.into(),
            location: GeoPoint::parse(lat, lon),
        }
    }

    /// Build from JSON fields that may be numbers, numeric strings or null
    pub fn from_json(label: impl Into<String>, lat: &Value, lon: &Value) -> Self {
        let location = match (json_number(lat), json_number(lon)) {
            (Some(lat), Some(lon)) => GeoPoint::new(lat, lon).ok(),
            _ => None,
        };

        Self {
            label: label.into(),
            location,
        }
    }
}

fn json_number(v: &Value) -> Option<f64> {
    match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
