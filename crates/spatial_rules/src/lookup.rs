use crate::geometry::BBox;
use crate::rules::SpatialRule;

use std::sync::Arc;

pub mod array;

pub use array::SpatialRuleLookupArray;

/// Point → rule lookup, filled once through `add_rule` and queried afterwards
pub trait SpatialRuleLookup {
    /// Adds a rule and indexes its current borders
    fn add_rule(&mut self, rule: Arc<SpatialRule>);

    /// Rule governing the given point, if any
    fn lookup_rule(&self, lat: f64, lon: f64) -> Option<&Arc<SpatialRule>>;

    /// Area covered by the lookup
    fn bounds(&self) -> &BBox;

    /// Rules in insertion order
    fn rules(&self) -> &[Arc<SpatialRule>];

    fn size(&self) -> usize {
        self.rules().len()
    }
}
