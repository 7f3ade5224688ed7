//! GeoJSON export of annotations.
//!
//! Each annotation becomes a Point feature at its drawn coordinate with a
//! `kind` property (`single` or `cluster`). Singles carry `name`; clusters
//! carry `count` and the `members` names. Payloads are not exported.

use crate::error::{ClusterError, Result};
use geocluster_types::Annotation;
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, JsonValue, Value};

/// Converts one annotation to a GeoJSON feature.
pub fn annotation_to_feature<P>(annotation: &Annotation<P>) -> Feature {
    let coordinate = annotation.coordinate();
    let geometry = Geometry::new(Value::Point(vec![coordinate.x(), coordinate.y()]));

    let mut properties = JsonObject::new();
    match annotation {
        Annotation::Single(poi) => {
            properties.insert("kind".to_string(), JsonValue::from("single"));
            properties.insert("name".to_string(), JsonValue::from(poi.name.clone()));
        }
        Annotation::Cluster { members, .. } => {
            properties.insert("kind".to_string(), JsonValue::from("cluster"));
            properties.insert("count".to_string(), JsonValue::from(members.len()));
            let names: Vec<JsonValue> = members
                .iter()
                .map(|poi| JsonValue::from(poi.name.clone()))
                .collect();
            properties.insert("members".to_string(), JsonValue::Array(names));
        }
    }

    Feature {
        bbox: None,
        geometry: Some(geometry),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

/// Converts annotations to a GeoJSON feature collection.
pub fn annotations_to_feature_collection<P>(annotations: &[Annotation<P>]) -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features: annotations.iter().map(annotation_to_feature).collect(),
        foreign_members: None,
    }
}

/// Converts annotations to a GeoJSON FeatureCollection string.
///
/// # Examples
///
/// ```
/// use geocluster::geojson::annotations_to_geojson;
/// use geocluster::{Annotation, Poi};
///
/// let annotations = vec![Annotation::Single(Poi::new("Hallasan", 33.3617, 126.5292, ()))];
/// let json = annotations_to_geojson(&annotations).unwrap();
/// assert!(json.contains("FeatureCollection"));
/// assert!(json.contains("Hallasan"));
/// ```
pub fn annotations_to_geojson<P>(annotations: &[Annotation<P>]) -> Result<String> {
    let collection = annotations_to_feature_collection(annotations);
    serde_json::to_string(&collection).map_err(|e| {
        ClusterError::SerializationErrorWithContext(format!(
            "Failed to serialize {} annotations: {}",
            annotations.len(),
            e
        ))
    })
}
