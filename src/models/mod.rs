//! Core data models: points, regions and candidates.

pub mod candidate;
pub mod point;
pub mod region;

pub use candidate::Candidate;
pub use point::GeoPoint;
pub use region::{Membership, Region};
