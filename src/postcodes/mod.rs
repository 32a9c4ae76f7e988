//! Postcode resolution via postcodes.io.

mod client;
mod outcode;

pub use client::PostcodesClient;
pub use outcode::{normalize_postcode, outcode_of};

use crate::error::Result;
use crate::models::GeoPoint;

/// Maps a postal code to its coordinates.
///
/// Fails with `Error::NotFound` for unknown codes and `Error::Service` for
/// anything that goes wrong upstream.
#[allow(async_fn_in_trait)]
pub trait CoordinateResolver {
    async fn resolve(&self, postcode: &str) -> Result<GeoPoint>;
}

impl CoordinateResolver for PostcodesClient {
    async fn resolve(&self, postcode: &str) -> Result<GeoPoint> {
        self.lookup(postcode).await
    }
}
