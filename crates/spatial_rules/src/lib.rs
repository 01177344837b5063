pub mod builder;
pub mod config;
pub mod constants;
pub mod error;
pub mod factory;
pub mod geojson_reader;
pub mod geometry;
pub mod lookup;
pub mod observer;
pub mod rules;

pub use builder::{LookupOptions, SpatialRuleLookupBuilder};
pub use config::Config;
pub use constants::{DEFAULT_ID_PROPERTY, DEFAULT_RESOLUTION, UNKNOWN_ID_PREFIX};
pub use error::{Result, SpatialRuleError};
pub use factory::{
    RuleRegistry, SpatialRuleDefaultFactory, SpatialRuleFactory, SpatialRuleListFactory,
};
pub use geojson_reader::{Feature, FeatureCollection, FeatureGeometry, read_feature_collection};
pub use geometry::{BBox, Polygon};
pub use lookup::{SpatialRuleLookup, SpatialRuleLookupArray};
pub use observer::{BuildObserver, LogObserver, NoopObserver, SkipReason};
pub use rules::{Access, RuleProfile, SpatialRule, TransportationMode};
