use crate::geometry::BBox;
use crate::rules::SpatialRule;

use itertools::Itertools;
use log::{debug, info};
use std::sync::Arc;

/// Why a build returned no lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// No feature produced a rule
    NoRules,
    /// Rules exist but none lies inside the requested bounds
    OutsideBounds,
}

/// Receives progress of a lookup build. All methods default to no-ops.
pub trait BuildObserver {
    /// Feature at `index` has no polygon geometry
    fn feature_skipped(&self, _index: usize) {}

    fn unknown_id_assigned(&self, _index: usize, _id: &str) {}

    /// The factory has no rule for `id`
    fn rule_not_applicable(&self, _id: &str) {}

    fn rule_accepted(&self, _rule: &SpatialRule) {}

    fn lookup_skipped(&self, _reason: SkipReason) {}

    fn lookup_created(&self, _bounds: &BBox, _rules: &[Arc<SpatialRule>]) {}
}

/// Discards every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl BuildObserver for NoopObserver {}

/// Forwards events to the `log` facade
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl BuildObserver for LogObserver {
    fn feature_skipped(&self, index: usize) {
        debug!("Skipping feature {index}: geometry is not a polygon");
    }

    fn unknown_id_assigned(&self, index: usize, id: &str) {
        debug!("Feature {index} has no id, using {id}");
    }

    fn rule_not_applicable(&self, id: &str) {
        debug!("No rule for {id}");
    }

    fn rule_accepted(&self, rule: &SpatialRule) {
        debug!(
            "Accepted rule {} with {} polygons",
            rule.id(),
            rule.borders().len()
        );
    }

    fn lookup_skipped(&self, reason: SkipReason) {
        match reason {
            SkipReason::NoRules => info!("No rules found, skipping SpatialRuleLookup"),
            SkipReason::OutsideBounds => {
                info!("Rules do not intersect the requested bounds, skipping SpatialRuleLookup")
            }
        }
    }

    fn lookup_created(&self, bounds: &BBox, rules: &[Arc<SpatialRule>]) {
        info!(
            "Created the SpatialRuleLookup with {} rules and a BBox of {} and the following rules: [{}]",
            rules.len(),
            bounds,
            rules.iter().map(|r| r.id()).join(", ")
        );
    }
}
