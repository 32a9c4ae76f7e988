//! Error type shared by every component of the library.

use thiserror::Error;

use crate::models::GeoPoint;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The upstream lookup has no entry for the requested code
    #[error("postcode '{0}' not found")]
    NotFound(String),

    /// Transport failure, timeout, non-success status or malformed response
    #[error("upstream service error: {0}")]
    Service(String),

    /// The routing service answered but produced no usable polygon
    #[error("no isochrone polygon returned for {minutes} minutes from {origin}")]
    EmptyRegion { origin: GeoPoint, minutes: u32 },

    #[error("invalid coordinate: lat={lat}, lon={lon}")]
    InvalidCoordinate { lat: f64, lon: f64 },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("candidate table: {0}")]
    Table(#[from] csv::Error),

    #[error("config: {0}")]
    Config(#[from] toml::de::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn service(msg: impl Into<String>) -> Self {
        Error::Service(msg.into())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Error::Service(format!("request timed out: {}", e))
        } else {
            Error::Service(e.to_string())
        }
    }
}
