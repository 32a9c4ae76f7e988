//! OpenRouteService isochrone client.

use geo::MultiPolygon;
use geojson::GeoJson;
use reqwest::header::AUTHORIZATION;
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, info};
use url::Url;

use crate::config::RoutingConfig;
use crate::error::{Error, Result};
use crate::models::{GeoPoint, Region};

const USER_AGENT: &str = "isoreach/0.1 (outcode reachability)";

#[derive(Debug, Serialize)]
struct IsochroneRequest {
    /// [lon, lat] pairs
    locations: Vec<[f64; 2]>,
    /// Travel time budgets in seconds
    range: Vec<u32>,
}

/// Client for `POST /v2/isochrones/{profile}`
#[derive(Clone)]
pub struct IsochroneClient {
    client: Client,
    endpoint: Url,
    api_key: String,
}

impl IsochroneClient {
    pub fn new(config: &RoutingConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| Error::InvalidInput("missing OpenRouteService API key".to_string()))?;

        let mut endpoint = Url::parse(&config.base_url).map_err(|e| {
            Error::InvalidInput(format!("routing base url '{}': {}", config.base_url, e))
        })?;
        endpoint
            .path_segments_mut()
            .map_err(|_| Error::InvalidInput(format!("'{}' cannot be a base url", config.base_url)))?
            .pop_if_empty()
            .extend(&["v2", "isochrones", config.profile.as_str()]);

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            client,
            endpoint,
            api_key,
        })
    }

    /// Fetch the region reachable from `origin` within `minutes`
    pub async fn isochrone(&self, origin: GeoPoint, minutes: u32) -> Result<Region> {
        if minutes == 0 {
            return Err(Error::InvalidInput(
                "travel time must be at least one minute".to_string(),
            ));
        }

        let seconds = minutes_to_seconds(minutes)?;
        info!("Fetching {}-minute isochrone from {}", minutes, origin);

        let body = IsochroneRequest {
            locations: vec![origin.to_lon_lat()],
            range: vec![seconds],
        };

        let response = self
            .client
            .post(self.endpoint.clone())
            .header(AUTHORIZATION, self.api_key.as_str())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(Error::service(format!(
                "isochrone request returned {}: {}",
                status, text
            )));
        }

        let text = response.text().await?;
        debug!("Isochrone response: {} bytes", text.len());

        parse_isochrone(&text, origin, minutes)
    }
}

fn minutes_to_seconds(minutes: u32) -> Result<u32> {
    minutes
        .checked_mul(60)
        .ok_or_else(|| Error::InvalidInput(format!("travel time of {} minutes is too large", minutes)))
}

/// Take the first feature of an isochrone FeatureCollection as the region
pub fn parse_isochrone(text: &str, origin: GeoPoint, minutes: u32) -> Result<Region> {
    let geojson: GeoJson = text
        .parse()
        .map_err(|e: geojson::Error| Error::service(format!("malformed isochrone GeoJSON: {}", e)))?;

    let collection = match geojson {
        GeoJson::FeatureCollection(fc) => fc,
        _ => {
            return Err(Error::service(
                "isochrone response is not a FeatureCollection",
            ))
        }
    };

    let empty = || Error::EmptyRegion { origin, minutes };

    let feature = collection.features.into_iter().next().ok_or_else(empty)?;
    let geometry = feature.geometry.ok_or_else(empty)?;

    let geometry = geo_types::Geometry::<f64>::try_from(geometry.value)
        .map_err(|e| Error::service(format!("unusable isochrone geometry: {}", e)))?;

    let polygons = match geometry {
        geo_types::Geometry::Polygon(p) => MultiPolygon::new(vec![p]),
        geo_types::Geometry::MultiPolygon(mp) => mp,
        _ => {
            return Err(Error::service(
                "isochrone geometry is neither Polygon nor MultiPolygon",
            ))
        }
    };

    if polygons.0.is_empty() {
        return Err(empty());
    }

    Ok(Region::new(polygons))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::spawn_upstream;
    use axum::extract::Path;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::{json, Value};

    fn square_collection() -> Value {
        json!({
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "properties": {"group_index": 0, "value": 1800.0},
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[-0.2, 51.4], [-0.2, 51.6], [0.0, 51.6], [0.0, 51.4], [-0.2, 51.4]]]
                }
            }]
        })
    }

    async fn isochrone_handler(
        Path(profile): Path<String>,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> (StatusCode, Json<Value>) {
        if headers.get("authorization").and_then(|v| v.to_str().ok()) != Some("test-key") {
            return (StatusCode::FORBIDDEN, Json(json!({"error": "bad key"})));
        }
        assert_eq!(body["locations"], json!([[-0.1278, 51.5074]]));
        assert_eq!(body["range"], json!([1800]));

        match profile.as_str() {
            "driving-car" => (StatusCode::OK, Json(square_collection())),
            "empty" => (
                StatusCode::OK,
                Json(json!({"type": "FeatureCollection", "features": []})),
            ),
            "no-geometry" => (
                StatusCode::OK,
                Json(json!({
                    "type": "FeatureCollection",
                    "features": [{"type": "Feature", "properties": {}, "geometry": null}]
                })),
            ),
            "point" => (
                StatusCode::OK,
                Json(json!({
                    "type": "FeatureCollection",
                    "features": [{
                        "type": "Feature",
                        "properties": {},
                        "geometry": {"type": "Point", "coordinates": [-0.1, 51.5]}
                    }]
                })),
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "routing engine down"})),
            ),
        }
    }

    async fn client_for(profile: &str, api_key: &str) -> IsochroneClient {
        let app = Router::new().route("/v2/isochrones/{profile}", post(isochrone_handler));
        let base_url = spawn_upstream(app).await;
        IsochroneClient::new(&RoutingConfig {
            base_url,
            profile: profile.to_string(),
            timeout_secs: 5,
            api_key: Some(api_key.to_string()),
        })
        .unwrap()
    }

    fn london() -> GeoPoint {
        GeoPoint::new(51.5074, -0.1278).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_square_isochrone() {
        let client = client_for("driving-car", "test-key").await;
        let region = client.isochrone(london(), 30).await.unwrap();

        assert!(region.contains(GeoPoint::new(51.5, -0.1).unwrap()));
        assert!(!region.contains(GeoPoint::new(51.3, -0.1).unwrap()));
    }

    #[tokio::test]
    async fn test_empty_features_is_empty_region() {
        let client = client_for("empty", "test-key").await;
        let err = client.isochrone(london(), 30).await.unwrap_err();
        assert!(matches!(err, Error::EmptyRegion { minutes: 30, .. }));
    }

    #[tokio::test]
    async fn test_null_geometry_is_empty_region() {
        let client = client_for("no-geometry", "test-key").await;
        let err = client.isochrone(london(), 30).await.unwrap_err();
        assert!(matches!(err, Error::EmptyRegion { .. }));
    }

    #[tokio::test]
    async fn test_non_polygon_geometry_is_service_error() {
        let client = client_for("point", "test-key").await;
        let err = client.isochrone(london(), 30).await.unwrap_err();
        assert!(matches!(err, Error::Service(_)));
    }

    #[tokio::test]
    async fn test_non_success_status_is_service_error() {
        let client = client_for("broken", "test-key").await;
        assert!(matches!(
            client.isochrone(london(), 30).await.unwrap_err(),
            Error::Service(_)
        ));

        let client = client_for("driving-car", "wrong-key").await;
        assert!(matches!(
            client.isochrone(london(), 30).await.unwrap_err(),
            Error::Service(_)
        ));
    }

    #[tokio::test]
    async fn test_zero_minutes_rejected() {
        let client = client_for("driving-car", "test-key").await;
        let err = client.isochrone(london(), 0).await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_missing_api_key() {
        let config = RoutingConfig::default();
        assert!(matches!(
            IsochroneClient::new(&config),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_parse_multipolygon() {
        let text = json!({
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "properties": {},
                "geometry": {
                    "type": "MultiPolygon",
                    "coordinates": [
                        [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0], [0.0, 0.0]]],
                        [[[5.0, 5.0], [6.0, 5.0], [6.0, 6.0], [5.0, 6.0], [5.0, 5.0]]]
                    ]
                }
            }]
        })
        .to_string();

        let region = parse_isochrone(&text, london(), 10).unwrap();
        assert_eq!(region.geometry().0.len(), 2);
        assert!(region.contains(GeoPoint::new(5.5, 5.5).unwrap()));
    }

    #[test]
    fn test_parse_garbage() {
        assert!(matches!(
            parse_isochrone("not json", london(), 10),
            Err(Error::Service(_))
        ));
    }

    #[test]
    fn test_minutes_to_seconds() {
        assert_eq!(minutes_to_seconds(30).unwrap(), 1800);
        assert!(minutes_to_seconds(u32::MAX).is_err());
    }
}
