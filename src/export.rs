//! GeoJSON rendering of a reachability result, for viewing on a map.

use geojson::{Feature, FeatureCollection, GeoJson, Geometry, JsonObject, Value};
use serde_json::json;
use std::fs;
use std::path::Path;
use tracing::info;

use crate::error::Result;
use crate::models::{Candidate, GeoPoint};
use crate::pipeline::Reachability;

fn feature(geometry: Value, properties: JsonObject) -> Feature {
    Feature {
        bbox: None,
        geometry: Some(Geometry::new(geometry)),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

fn point(p: GeoPoint) -> Value {
    Value::Point(p.to_lon_lat().to_vec())
}

fn candidate_feature(candidate: &Candidate, kind: &str) -> Option<Feature> {
    let location = candidate.location?;
    let mut properties = JsonObject::new();
    properties.insert("kind".to_string(), json!(kind));
    properties.insert("label".to_string(), json!(candidate.label));
    Some(feature(point(location), properties))
}

/// Isochrone, reachable and unreachable candidates, and the origin
pub fn to_feature_collection(result: &Reachability) -> FeatureCollection {
    let mut features = Vec::with_capacity(result.inside.len() + result.outside.len() + 2);

    let mut region_props = JsonObject::new();
    region_props.insert("kind".to_string(), json!("isochrone"));
    region_props.insert("minutes".to_string(), json!(result.minutes));
    features.push(feature(
        Value::from(result.region.geometry()),
        region_props,
    ));

    features.extend(
        result
            .inside
            .iter()
            .filter_map(|c| candidate_feature(c, "reachable")),
    );
    features.extend(
        result
            .outside
            .iter()
            .filter_map(|c| candidate_feature(c, "unreachable")),
    );

    let mut origin_props = JsonObject::new();
    origin_props.insert("kind".to_string(), json!("origin"));
    origin_props.insert("postcode".to_string(), json!(result.postcode));
    features.push(feature(point(result.origin), origin_props));

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

pub fn write_geojson(result: &Reachability, path: &Path) -> Result<()> {
    let collection = to_feature_collection(result);
    let count = collection.features.len();
    fs::write(path, GeoJson::from(collection).to_string())?;
    info!("Map with {} features saved as {}", count, path.display());
    Ok(())
}
