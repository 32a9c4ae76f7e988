//! Candidate outcodes around an origin.
//!
//! Two interchangeable strategies: a postcodes.io radius search capped at a
//! result limit, or a full scan of a precomputed outcode table.

mod aggregate;
mod table;

pub use aggregate::{
    aggregate_outcodes, build_outcode_table, write_outcode_table, DirectoryColumns, OutcodeRow,
};
pub use table::{TableColumns, TableSupplier};

use tracing::debug;

use crate::error::Result;
use crate::models::{Candidate, GeoPoint};
use crate::postcodes::PostcodesClient;

#[allow(async_fn_in_trait)]
pub trait CandidateSupplier {
    /// Candidates near `origin`. Implementations may ignore `radius_m`.
    async fn candidates(&self, origin: GeoPoint, radius_m: u32) -> Result<Vec<Candidate>>;
}

/// Radius search against postcodes.io.
///
/// The service truncates at `limit` rows, so recall is bounded by the limit
/// as well as by the radius.
#[derive(Clone)]
pub struct RemoteSupplier {
    client: PostcodesClient,
    limit: u32,
}

impl RemoteSupplier {
    pub fn new(client: PostcodesClient, limit: u32) -> Self {
        Self { client, limit }
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }
}

impl CandidateSupplier for RemoteSupplier {
    async fn candidates(&self, origin: GeoPoint, radius_m: u32) -> Result<Vec<Candidate>> {
        self.client.nearby(origin, radius_m, self.limit).await
    }
}

impl CandidateSupplier for TableSupplier {
    async fn candidates(&self, _origin: GeoPoint, radius_m: u32) -> Result<Vec<Candidate>> {
        debug!(
            "Table scan returns all {} rows (radius {} m not applied)",
            self.len(),
            radius_m
        );
        Ok(self.rows().to_vec())
    }
}

/// Strategy chosen at runtime
pub enum CandidateSource {
    Remote(RemoteSupplier),
    Table(TableSupplier),
}

impl CandidateSupplier for CandidateSource {
    async fn candidates(&self, origin: GeoPoint, radius_m: u32) -> Result<Vec<Candidate>> {
        match self {
            CandidateSource::Remote(remote) => remote.candidates(origin, radius_m).await,
            CandidateSource::Table(table) => table.candidates(origin, radius_m).await,
        }
    }
}
