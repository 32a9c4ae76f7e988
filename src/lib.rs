//! isoreach - which UK postcode outcodes can be reached by car in N minutes.
//!
//! This library provides the postcode, isochrone and candidate clients, the
//! point-in-polygon filter, and the pipeline used by the `reach` and
//! `outcodes` binaries.

pub mod candidates;
pub mod config;
pub mod error;
pub mod export;
pub mod logging;
pub mod models;
pub mod pip;
pub mod pipeline;
pub mod postcodes;
pub mod routing;

#[cfg(test)]
mod test_support;

pub use error::{Error, Result};
pub use models::{Candidate, GeoPoint, Region};
pub use pip::{filter_labels, partition, FilterResult};
pub use pipeline::{reachable_outcodes, Reachability};
