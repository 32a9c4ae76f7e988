//! Point-in-Polygon (PIP) membership of candidates in a region.
//!
//! Candidates are pre-selected with an R-tree envelope query and then
//! checked with exact, boundary-inclusive containment.

mod filter;
mod index;

pub use filter::{filter_labels, partition, FilterResult, Partition};
pub use index::CandidateIndex;
