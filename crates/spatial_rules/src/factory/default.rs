use super::SpatialRuleFactory;
use crate::geometry::Polygon;
use crate::rules::SpatialRule;

use std::sync::Arc;

/// Creates one generic rule per identifier found in the data
#[derive(Debug, Clone, Copy, Default)]
pub struct SpatialRuleDefaultFactory;

impl SpatialRuleFactory for SpatialRuleDefaultFactory {
    fn create_spatial_rule(&self, id: &str, polygons: &[Polygon]) -> Option<Arc<SpatialRule>> {
        Some(Arc::new(SpatialRule::new(id, polygons.to_vec())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{Access, TransportationMode};

    #[test]
    fn test_always_creates_fresh_rule() {
        let polygon = Polygon::from_points(&[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0)]).unwrap();
        let factory = SpatialRuleDefaultFactory;

        let first = factory
            .create_spatial_rule("ABC", std::slice::from_ref(&polygon))
            .unwrap();
        let second = factory.create_spatial_rule("ABC", &[]).unwrap();

        assert_eq!(first.id(), "ABC");
        assert_eq!(first.borders().as_slice(), &[polygon]);
        assert!(second.borders().is_empty());
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(
            first.access("track", TransportationMode::Car, Access::Yes),
            Access::Yes
        );
    }
}
