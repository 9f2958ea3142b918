use crate::core::{bounds::BoundingBox, geo::LatLng};
use serde::{Deserialize, Serialize};

/// String-keyed JSON object used for feature properties and layer styles.
/// Iteration order is deterministic (sorted by key).
pub type JsonMap = serde_json::Map<String, serde_json::Value>;

/// GeoJSON geometry types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GeoJsonGeometry {
    Point {
        coordinates: [f64; 2],
    },
    LineString {
        coordinates: Vec<[f64; 2]>,
    },
    Polygon {
        coordinates: Vec<Vec<[f64; 2]>>,
    },
    MultiPoint {
        coordinates: Vec<[f64; 2]>,
    },
    MultiLineString {
        coordinates: Vec<Vec<[f64; 2]>>,
    },
    MultiPolygon {
        coordinates: Vec<Vec<Vec<[f64; 2]>>>,
    },
}

/// GeoJSON feature with geometry and properties
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoJsonFeature {
    pub id: Option<serde_json::Value>,
    pub geometry: Option<GeoJsonGeometry>,
    pub properties: Option<JsonMap>,
}

/// Root GeoJSON document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GeoJson {
    Feature(GeoJsonFeature),
    FeatureCollection { features: Vec<GeoJsonFeature> },
}

impl GeoJson {
    /// All features in the document, in document order
    pub fn features(&self) -> Vec<&GeoJsonFeature> {
        match self {
            GeoJson::Feature(feature) => vec![feature],
            GeoJson::FeatureCollection { features } => features.iter().collect(),
        }
    }

    pub fn feature_count(&self) -> usize {
        match self {
            GeoJson::Feature(_) => 1,
            GeoJson::FeatureCollection { features } => features.len(),
        }
    }

    pub fn is_feature_collection(&self) -> bool {
        matches!(self, GeoJson::FeatureCollection { .. })
    }

    /// Bounding box over Point geometries only; other geometry types do not
    /// contribute. Returns `None` when no Point coordinate exists.
    pub fn point_bounds(&self) -> Option<BoundingBox> {
        let mut bounds: Option<BoundingBox> = None;

        for feature in self.features() {
            if let Some(GeoJsonGeometry::Point { coordinates }) = &feature.geometry {
                let point = LatLng::new(coordinates[1], coordinates[0]);
                match bounds.as_mut() {
                    Some(b) => b.extend(&point),
                    None => bounds = Some(BoundingBox::from_point(&point)),
                }
            }
        }

        bounds
    }
}
