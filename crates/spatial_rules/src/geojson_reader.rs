use crate::error::{Result, SpatialRuleError};
use crate::geometry::Polygon;

use geojson::GeoJson;
use serde_json::{Map, Value};
use std::io::Read;
use std::path::Path;

/// Geometry of a single feature
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureGeometry {
    /// `Polygon` or `MultiPolygon`, one entry per member polygon
    Polygon(Vec<Polygon>),
    /// Any other GeoJSON geometry type (kept by name only)
    Other(String),
}

impl FeatureGeometry {
    pub fn is_polygon(&self) -> bool {
        matches!(self, FeatureGeometry::Polygon(_))
    }

    pub fn as_polygons(&self) -> Option<&[Polygon]> {
        match self {
            FeatureGeometry::Polygon(polygons) => Some(polygons),
            FeatureGeometry::Other(_) => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Feature {
    pub geometry: Option<FeatureGeometry>,
    pub properties: Map<String, Value>,
}

impl Feature {
    pub fn new(geometry: Option<FeatureGeometry>, properties: Map<String, Value>) -> Self {
        Self {
            geometry,
            properties,
        }
    }

    /// Polygons of this feature, `None` for non-polygon or missing geometry
    pub fn polygons(&self) -> Option<&[Polygon]> {
        self.geometry
            .as_ref()
            .and_then(FeatureGeometry::as_polygons)
    }

    /// String value of a property. Non-string values count as absent.
    pub fn property_str(&self, key: &str) -> Option<&str> {
        self.properties.get(key).and_then(Value::as_str)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureCollection {
    features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        Self { features }
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

impl FromIterator<Feature> for FeatureCollection {
    fn from_iter<I: IntoIterator<Item = Feature>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Reads a GeoJSON FeatureCollection from a file
///
/// # Errors
/// Returns error if the file cannot be read or is not a valid FeatureCollection
pub fn read_feature_collection<P: AsRef<Path>>(path: P) -> Result<FeatureCollection> {
    let file = std::fs::File::open(path)?;
    read_feature_collection_from_reader(std::io::BufReader::new(file))
}

pub fn read_feature_collection_from_reader<R: Read>(reader: R) -> Result<FeatureCollection> {
    let value: Value = serde_json::from_reader(reader)?;
    convert_collection(value)
}

pub fn parse_feature_collection(json: &str) -> Result<FeatureCollection> {
    let value: Value = serde_json::from_str(json)?;
    convert_collection(value)
}

fn convert_collection(value: Value) -> Result<FeatureCollection> {
    let geojson = GeoJson::from_json_value(value)
        .map_err(|e| SpatialRuleError::InvalidGeoJson(e.to_string()))?;
    let collection = match geojson {
        GeoJson::FeatureCollection(collection) => collection,
        GeoJson::Feature(_) => return Err(not_a_collection("Feature")),
        GeoJson::Geometry(_) => return Err(not_a_collection("Geometry")),
    };

    collection
        .features
        .into_iter()
        .enumerate()
        .map(|(index, feature)| -> Result<Feature> {
            let geometry = feature
                .geometry
                .map(|g| convert_geometry(g, index))
                .transpose()?;
            Ok(Feature::new(geometry, feature.properties.unwrap_or_default()))
        })
        .collect()
}

fn not_a_collection(found: &str) -> SpatialRuleError {
    SpatialRuleError::InvalidGeoJson(format!("expected a FeatureCollection, found a {found}"))
}

fn convert_geometry(geometry: geojson::Geometry, index: usize) -> Result<FeatureGeometry> {
    let kind = geometry_kind(&geometry.value);
    if !matches!(kind, "Polygon" | "MultiPolygon") {
        return Ok(FeatureGeometry::Other(kind.to_string()));
    }

    let shape: geo::Geometry<f64> = geometry
        .try_into()
        .map_err(|e| invalid_feature(index, e))?;
    let shapes = match shape {
        geo::Geometry::Polygon(polygon) => vec![polygon],
        geo::Geometry::MultiPolygon(multi) => multi.0,
        _ => return Ok(FeatureGeometry::Other(kind.to_string())),
    };

    shapes
        .into_iter()
        .map(|shape| Polygon::from_geo(shape).map_err(|e| invalid_feature(index, e)))
        .collect::<Result<Vec<_>>>()
        .map(FeatureGeometry::Polygon)
}

fn invalid_feature(index: usize, error: impl std::fmt::Display) -> SpatialRuleError {
    SpatialRuleError::InvalidGeoJson(format!("feature {index}: {error}"))
}

fn geometry_kind(value: &geojson::Value) -> &'static str {
    match value {
        geojson::Value::Point(_) => "Point",
        geojson::Value::MultiPoint(_) => "MultiPoint",
        geojson::Value::LineString(_) => "LineString",
        geojson::Value::MultiLineString(_) => "MultiLineString",
        geojson::Value::Polygon(_) => "Polygon",
        geojson::Value::MultiPolygon(_) => "MultiPolygon",
        geojson::Value::GeometryCollection(_) => "GeometryCollection",
    }
}
