pub mod countries;
pub mod rule;

pub use countries::{AustriaProfile, DefaultProfile, GermanyProfile};
pub use rule::{Access, RuleProfile, SpatialRule, TransportationMode};
