//! Drive-time regions from a routing service.

mod isochrone;

pub use isochrone::{parse_isochrone, IsochroneClient};

use crate::error::Result;
use crate::models::{GeoPoint, Region};

/// Maps an origin and a travel-time budget (minutes) to a reachable region
#[allow(async_fn_in_trait)]
pub trait RegionProvider {
    async fn region(&self, origin: GeoPoint, minutes: u32) -> Result<Region>;
}

impl RegionProvider for IsochroneClient {
    async fn region(&self, origin: GeoPoint, minutes: u32) -> Result<Region> {
        self.isochrone(origin, minutes).await
    }
}
