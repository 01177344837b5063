use super::bbox::BBox;
use crate::error::{Result, SpatialRuleError};

use geo::{BoundingRect, Contains, Intersects, LineString, Point};

/// Lat/lon polygon (outer ring plus holes) with a precomputed extent
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    shape: geo::Polygon<f64>,
    extent: BBox,
}

impl Polygon {
    /// Creates a polygon without holes from parallel coordinate arrays.
    ///
    /// # Errors
    /// Returns `GeometryError` if the arrays differ in length, have fewer than
    /// three points, or contain non-finite values.
    pub fn new(lats: Vec<f64>, lons: Vec<f64>) -> Result<Self> {
        if lats.len() != lons.len() {
            return Err(SpatialRuleError::GeometryError {
                message: format!(
                    "latitude and longitude count differ: {} vs {}",
                    lats.len(),
                    lons.len()
                ),
            });
        }

        let exterior: LineString<f64> = lons.into_iter().zip(lats).collect();
        Self::from_geo(geo::Polygon::new(exterior, Vec::new()))
    }

    /// Wraps a `geo` polygon (x = lon, y = lat), holes included.
    ///
    /// # Errors
    /// Returns `GeometryError` if the outer ring has fewer than three points
    /// or any ring contains non-finite values.
    pub fn from_geo(shape: geo::Polygon<f64>) -> Result<Self> {
        // rings are closed, the first point is repeated at the end
        let vertices = shape.exterior().0.len().saturating_sub(1);
        if vertices < 3 {
            return Err(SpatialRuleError::GeometryError {
                message: format!("polygon needs at least 3 points, got {vertices}"),
            });
        }

        let finite = shape
            .exterior()
            .coords()
            .chain(shape.interiors().iter().flat_map(|ring| ring.coords()))
            .all(|c| c.x.is_finite() && c.y.is_finite());
        if !finite {
            return Err(SpatialRuleError::GeometryError {
                message: "polygon contains non-finite coordinates".to_string(),
            });
        }

        let extent = shape
            .bounding_rect()
            .map(BBox::from)
            .ok_or_else(|| SpatialRuleError::GeometryError {
                message: "polygon has no extent".to_string(),
            })?;

        Ok(Self { shape, extent })
    }

    /// Creates a polygon from `(lat, lon)` pairs
    pub fn from_points(points: &[(f64, f64)]) -> Result<Self> {
        let (lats, lons) = points.iter().copied().unzip();
        Self::new(lats, lons)
    }

    /// Axis-aligned rectangle as a 4-point polygon
    pub fn from_bbox(bbox: &BBox) -> Result<Self> {
        Self::from_geo(bbox.to_rect().to_polygon())
    }

    pub fn min_lat(&self) -> f64 {
        self.extent.min_lat
    }
    pub fn max_lat(&self) -> f64 {
        self.extent.max_lat
    }
    pub fn min_lon(&self) -> f64 {
        self.extent.min_lon
    }
    pub fn max_lon(&self) -> f64 {
        self.extent.max_lon
    }

    /// Number of points of the outer ring, closing point excluded
    pub fn len(&self) -> usize {
        self.shape.exterior().0.len().saturating_sub(1)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of holes
    pub fn holes(&self) -> usize {
        self.shape.interiors().len()
    }

    pub fn as_geo(&self) -> &geo::Polygon<f64> {
        &self.shape
    }

    pub fn bbox(&self) -> BBox {
        self.extent
    }

    /// Points on the boundary or inside a hole are outside.
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        self.extent.contains(lat, lon) && self.shape.contains(&Point::new(lon, lat))
    }

    /// Shares at least one point with `bbox`, edges included
    pub fn intersects(&self, bbox: &BBox) -> bool {
        self.extent.intersects(bbox) && self.shape.intersects(&bbox.to_rect())
    }
}
