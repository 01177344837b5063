use crate::geometry::Polygon;
use crate::rules::SpatialRule;

use std::sync::Arc;

pub mod default;
pub mod list;
pub mod registry;

pub use default::SpatialRuleDefaultFactory;
pub use list::SpatialRuleListFactory;
pub use registry::{RuleConstructor, RuleRegistry};

/// Turns a feature identifier and its polygons into a rule
pub trait SpatialRuleFactory {
    /// Creates the rule for `id` with `polygons` as its borders.
    ///
    /// `None` means the feature is not governed by any rule and must be left
    /// out of the lookup.
    fn create_spatial_rule(&self, id: &str, polygons: &[Polygon]) -> Option<Arc<SpatialRule>>;
}
