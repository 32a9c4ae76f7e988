//! postcodes.io client: single postcode lookup and radius search.

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use super::outcode::{normalize_postcode, outcode_of};
use crate::config::PostcodesConfig;
use crate::error::{Error, Result};
use crate::models::{Candidate, GeoPoint};

const USER_AGENT: &str = "isoreach/0.1 (outcode reachability)";

#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    status: Option<u16>,
    #[serde(default)]
    result: Option<LookupResult>,
}

#[derive(Debug, Deserialize)]
struct LookupResult {
    #[serde(default)]
    latitude: Option<f64>,
    #[serde(default)]
    longitude: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct NearbyResponse {
    #[serde(default)]
    result: Option<Vec<NearbyRow>>,
}

#[derive(Debug, Deserialize)]
struct NearbyRow {
    #[serde(default)]
    postcode: Option<String>,
    #[serde(default)]
    outcode: Option<String>,
    #[serde(default)]
    latitude: Value,
    #[serde(default)]
    longitude: Value,
}

impl NearbyRow {
    fn into_candidate(self) -> Option<Candidate> {
        let label = match self.outcode {
            Some(o) if !o.trim().is_empty() => o.trim().to_string(),
            _ => outcode_of(self.postcode.as_deref()?)?.to_string(),
        };
        Some(Candidate::from_json(label, &self.latitude, &self.longitude))
    }
}

/// HTTP client for the postcodes.io API
#[derive(Clone)]
pub struct PostcodesClient {
    client: Client,
    base_url: Url,
}

impl PostcodesClient {
    pub fn new(config: &PostcodesConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            Error::InvalidInput(format!("postcodes base url '{}': {}", config.base_url, e))
        })?;

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout())
            .build()?;

        Ok(Self { client, base_url })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::InvalidInput(format!("'{}' cannot be a base url", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Resolve a postcode to its coordinates
    pub async fn lookup(&self, postcode: &str) -> Result<GeoPoint> {
        let code = normalize_postcode(postcode)
            .ok_or_else(|| Error::NotFound(postcode.trim().to_string()))?;

        let url = self.endpoint(&["postcodes", &code])?;
        debug!("Looking up postcode {} at {}", code, url);

        let response = self.client.get(url).send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(Error::NotFound(code));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::service(format!(
                "postcode lookup returned {}: {}",
                status, body
            )));
        }

        let body: LookupResponse = response
            .json()
            .await
            .map_err(|e| Error::service(format!("malformed postcode lookup response: {}", e)))?;

        if body.status == Some(404) {
            return Err(Error::NotFound(code));
        }

        let result = body
            .result
            .ok_or_else(|| Error::service(format!("no result for postcode {}", code)))?;

        match (result.latitude, result.longitude) {
            (Some(lat), Some(lon)) => GeoPoint::new(lat, lon).map_err(|e| {
                Error::service(format!("postcode {} has unusable coordinates: {}", code, e))
            }),
            _ => Err(Error::service(format!(
                "postcode {} has no coordinates upstream",
                code
            ))),
        }
    }

    /// Postcodes around `origin`, at most `limit` rows (0 means uncapped)
    pub async fn nearby(&self, origin: GeoPoint, radius_m: u32, limit: u32) -> Result<Vec<Candidate>> {
        let mut url = self.endpoint(&["postcodes"])?;
        url.query_pairs_mut()
            .append_pair("lon", &origin.lon().to_string())
            .append_pair("lat", &origin.lat().to_string())
            .append_pair("radius", &radius_m.to_string())
            .append_pair("wideSearch", "true")
            .append_pair("limit", &limit.to_string());

        debug!("Radius search at {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::service(format!(
                "radius search returned {}: {}",
                status, body
            )));
        }

        let body: NearbyResponse = response
            .json()
            .await
            .map_err(|e| Error::service(format!("malformed radius search response: {}", e)))?;

        let mut rows = body.result.unwrap_or_default();

        if limit > 0 && rows.len() >= limit as usize {
            warn!(
                "Radius search hit the {} result cap; candidates beyond it are missing",
                limit
            );
            rows.truncate(limit as usize);
        }
        let returned = rows.len();

        let candidates: Vec<Candidate> = rows
            .into_iter()
            .filter_map(NearbyRow::into_candidate)
            .collect();

        if candidates.len() < returned {
            debug!(
                "Dropped {} unlabelled rows from radius search",
                returned - candidates.len()
            );
        }

        Ok(candidates)
    }
}
