use crate::error::{Result, SpatialRuleError};
use geo::{Rect, coord};
use std::{fmt, str::FromStr};

/// Axis-aligned lat/lon rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BBox {
    pub min_lon: f64,
    pub max_lon: f64,
    pub min_lat: f64,
    pub max_lat: f64,
}

impl BBox {
    pub fn new(min_lon: f64, max_lon: f64, min_lat: f64, max_lat: f64) -> Self {
        Self {
            min_lon,
            max_lon,
            min_lat,
            max_lat,
        }
    }

    /// Empty accumulator: every `update` shrinks min and grows max from the extremes.
    pub fn inverse() -> Self {
        Self {
            min_lon: f64::MAX,
            max_lon: -f64::MAX,
            min_lat: f64::MAX,
            max_lat: -f64::MAX,
        }
    }

    pub fn world() -> Self {
        let (min_lon, max_lon, min_lat, max_lat) = crate::constants::WORLD_BOUNDS;
        Self::new(min_lon, max_lon, min_lat, max_lat)
    }

    /// Expand to include the given point
    pub fn update(&mut self, lat: f64, lon: f64) {
        self.min_lat = self.min_lat.min(lat);
        self.max_lat = self.max_lat.max(lat);
        self.min_lon = self.min_lon.min(lon);
        self.max_lon = self.max_lon.max(lon);
    }

    /// A box is valid only if it spans a non-zero area.
    pub fn is_valid(&self) -> bool {
        self.min_lon < self.max_lon && self.min_lat < self.max_lat
    }

    pub fn intersects(&self, other: &BBox) -> bool {
        self.max_lat >= other.min_lat
            && self.max_lon >= other.min_lon
            && self.min_lat <= other.max_lat
            && self.min_lon <= other.max_lon
    }

    /// Overlap of two boxes; `None` when they are disjoint or only share an edge.
    pub fn intersection(&self, other: &BBox) -> Option<BBox> {
        if !self.intersects(other) {
            return None;
        }
        let overlap = BBox::new(
            self.min_lon.max(other.min_lon),
            self.max_lon.min(other.max_lon),
            self.min_lat.max(other.min_lat),
            self.max_lat.min(other.max_lat),
        );
        overlap.is_valid().then_some(overlap)
    }

    /// Inclusive point containment
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        lat >= self.min_lat && lat <= self.max_lat && lon >= self.min_lon && lon <= self.max_lon
    }

    pub fn width(&self) -> f64 {
        self.max_lon - self.min_lon
    }

    pub fn height(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    /// Same box as a `geo` rectangle (x = lon, y = lat)
    pub fn to_rect(&self) -> Rect<f64> {
        Rect::new(
            coord! { x: self.min_lon, y: self.min_lat },
            coord! { x: self.max_lon, y: self.max_lat },
        )
    }
}

impl From<Rect<f64>> for BBox {
    fn from(rect: Rect<f64>) -> Self {
        Self::new(rect.min().x, rect.max().x, rect.min().y, rect.max().y)
    }
}

impl fmt::Display for BBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{},{}",
            self.min_lon, self.max_lon, self.min_lat, self.max_lat
        )
    }
}

/// Parses `minLon,maxLon,minLat,maxLat`
impl FromStr for BBox {
    type Err = SpatialRuleError;

    fn from_str(s: &str) -> Result<Self> {
        let values = s
            .split(',')
            .map(|v| {
                v.trim()
                    .parse::<f64>()
                    .map_err(|e| SpatialRuleError::InvalidBounds(format!("'{}': {}", v.trim(), e)))
            })
            .collect::<Result<Vec<f64>>>()?;

        let &[min_lon, max_lon, min_lat, max_lat] = values.as_slice() else {
            return Err(SpatialRuleError::InvalidBounds(format!(
                "expected 4 values (minLon,maxLon,minLat,maxLat), got {}",
                values.len()
            )));
        };

        let bbox = BBox::new(min_lon, max_lon, min_lat, max_lat);
        if !bbox.is_valid() {
            return Err(SpatialRuleError::InvalidBounds(format!(
                "{bbox} does not span an area"
            )));
        }
        Ok(bbox)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inverse_is_invalid_until_updated() {
        let mut bbox = BBox::inverse();
        assert!(!bbox.is_valid());

        bbox.update(10.0, 20.0);
        // a single point has no area
        assert!(!bbox.is_valid());

        bbox.update(12.0, 25.0);
        assert!(bbox.is_valid());
        assert_eq!(bbox, BBox::new(20.0, 25.0, 10.0, 12.0));
    }

    #[test]
    fn test_intersection_overlap() {
        let a = BBox::new(0.0, 10.0, 0.0, 10.0);
        let b = BBox::new(5.0, 15.0, -5.0, 5.0);
        assert_eq!(a.intersection(&b), Some(BBox::new(5.0, 10.0, 0.0, 5.0)));
        assert_eq!(b.intersection(&a), a.intersection(&b));
    }

    #[test]
    fn test_intersection_disjoint() {
        let a = BBox::new(0.0, 1.0, 0.0, 1.0);
        let b = BBox::new(2.0, 3.0, 2.0, 3.0);
        assert_eq!(a.intersection(&b), None);
    }

    #[test]
    fn test_intersection_touching_edge_is_none() {
        let a = BBox::new(0.0, 1.0, 0.0, 1.0);
        let b = BBox::new(1.0, 2.0, 0.0, 1.0);
        assert!(a.intersects(&b));
        assert_eq!(a.intersection(&b), None);
    }

    #[test]
    fn test_intersection_contained() {
        let outer = BBox::world();
        let inner = BBox::new(5.8, 15.1, 47.2, 55.1);
        assert_eq!(outer.intersection(&inner), Some(inner));
    }

    #[test]
    fn test_parse_bbox() {
        let bbox: BBox = "5.8, 15.1, 47.2, 55.1".parse().unwrap();
        assert_eq!(bbox, BBox::new(5.8, 15.1, 47.2, 55.1));
        assert_eq!(bbox.to_string(), "5.8,15.1,47.2,55.1");
    }

    #[test]
    fn test_rect_conversion() {
        let bbox = BBox::new(5.8, 15.1, 47.2, 55.1);
        let rect = bbox.to_rect();
        assert_eq!(rect.min().x, 5.8);
        assert_eq!(rect.max().y, 55.1);
        assert_eq!(BBox::from(rect), bbox);
    }

    #[test]
    fn test_parse_bbox_errors() {
        assert!("1,2,3".parse::<BBox>().is_err());
        assert!("1,2,x,4".parse::<BBox>().is_err());
        // min > max
        assert!("2,1,3,4".parse::<BBox>().is_err());
    }
}
