//! Postcode → isochrone → reachable outcodes.

use tracing::info;

use crate::candidates::CandidateSupplier;
use crate::error::Result;
use crate::models::{Candidate, GeoPoint, Region};
use crate::pip::{partition, FilterResult};
use crate::postcodes::CoordinateResolver;
use crate::routing::RegionProvider;

/// Everything computed for one query
#[derive(Debug)]
pub struct Reachability {
    pub postcode: String,
    pub origin: GeoPoint,
    pub minutes: u32,
    pub region: Region,
    pub inside: Vec<Candidate>,
    pub outside: Vec<Candidate>,
    /// Candidates dropped for lacking a usable location
    pub skipped: usize,
    pub outcodes: FilterResult,
}

/// Outcodes reachable within `minutes` of `postcode`.
///
/// Runs the three upstream calls one after another; the first error aborts.
pub async fn reachable_outcodes<R, P, S>(
    resolver: &R,
    provider: &P,
    supplier: &S,
    postcode: &str,
    minutes: u32,
    radius_m: u32,
) -> Result<Reachability>
where
    R: CoordinateResolver,
    P: RegionProvider,
    S: CandidateSupplier,
{
    let origin = resolver.resolve(postcode).await?;
    info!("{} located at {}", postcode, origin);

    let region = provider.region(origin, minutes).await?;
    info!("Retrieved {}-minute isochrone", minutes);

    let candidates = supplier.candidates(origin, radius_m).await?;
    info!("Checking {} candidates", candidates.len());

    let parts = partition(&region, &candidates);
    let outcodes = parts.labels();
    let inside: Vec<Candidate> = parts.inside.into_iter().cloned().collect();
    let outside: Vec<Candidate> = parts.outside.into_iter().cloned().collect();
    let skipped = parts.skipped;

    info!(
        "Found {} reachable outcodes ({} of {} candidates inside)",
        outcodes.len(),
        inside.len(),
        candidates.len()
    );

    Ok(Reachability {
        postcode: postcode.to_string(),
        origin,
        minutes,
        region,
        inside,
        outside,
        skipped,
        outcodes,
    })
}
