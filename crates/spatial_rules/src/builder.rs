//! Builds a [`SpatialRuleLookupArray`] from a feature collection.
//!
//! Every polygon feature is turned into at most one rule through a
//! [`SpatialRuleFactory`], keyed by a string property of the feature. The
//! lookup only covers the part of the rules' extent that lies inside the
//! caller's bounds, and no lookup is built when nothing would be in it.

use crate::constants::{DEFAULT_ID_PROPERTY, DEFAULT_RESOLUTION, UNKNOWN_ID_PREFIX};
use crate::error::{Result, SpatialRuleError};
use crate::factory::{RuleRegistry, SpatialRuleFactory, SpatialRuleListFactory};
use crate::geojson_reader::FeatureCollection;
use crate::geometry::BBox;
use crate::lookup::{SpatialRuleLookup, SpatialRuleLookupArray};
use crate::observer::{BuildObserver, LogObserver, SkipReason};
use crate::rules::SpatialRule;

use itertools::Itertools;
use std::collections::HashSet;
use std::sync::Arc;

/// Grid settings passed through to the lookup
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LookupOptions {
    /// Cell size in degrees
    pub resolution: f64,
    /// Test points against the polygons instead of the cell owner
    pub exact: bool,
}

impl Default for LookupOptions {
    fn default() -> Self {
        Self {
            resolution: DEFAULT_RESOLUTION,
            exact: false,
        }
    }
}

/// Accepted rules of one build
#[derive(Debug)]
struct RuleSet {
    rules: Vec<Arc<SpatialRule>>,
    ids: HashSet<String>,
    unknown_counter: usize,
    bounds: BBox,
}

impl RuleSet {
    fn new() -> Self {
        Self {
            rules: Vec::new(),
            ids: HashSet::new(),
            unknown_counter: 0,
            bounds: BBox::inverse(),
        }
    }

    fn next_unknown_id(&mut self) -> String {
        let id = format!("{UNKNOWN_ID_PREFIX}{}", self.unknown_counter);
        self.unknown_counter += 1;
        id
    }

    /// Records `id`; an id may only be used once per build
    fn claim_id(&mut self, id: &str, property: &str) -> Result<()> {
        if !self.ids.insert(id.to_string()) {
            return Err(SpatialRuleError::DuplicateId {
                id: id.to_string(),
                property: property.to_string(),
            });
        }
        Ok(())
    }

    fn accept(&mut self, rule: Arc<SpatialRule>) {
        for polygon in rule.borders().iter() {
            self.bounds.update(polygon.min_lat(), polygon.min_lon());
            self.bounds.update(polygon.max_lat(), polygon.max_lon());
        }
        self.rules.push(rule);
    }
}

pub struct SpatialRuleLookupBuilder {
    observer: Box<dyn BuildObserver>,
}

impl Default for SpatialRuleLookupBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SpatialRuleLookupBuilder {
    /// Builder reporting through the `log` facade
    pub fn new() -> Self {
        Self::with_observer(LogObserver)
    }

    pub fn with_observer(observer: impl BuildObserver + 'static) -> Self {
        Self {
            observer: Box::new(observer),
        }
    }

    /// Resolves the comma-separated `rule_names` through `registry` and builds
    /// with the default id property.
    pub fn build_from_names(
        &self,
        registry: &RuleRegistry,
        rule_names: &str,
        features: &FeatureCollection,
        bounds: &BBox,
        options: LookupOptions,
    ) -> Result<Option<SpatialRuleLookupArray>> {
        let factory = SpatialRuleListFactory::from_name_list(registry, rule_names)?;
        self.build(DEFAULT_ID_PROPERTY, &factory, features, bounds, options)
    }

    /// Connects the features with rules via their `id_property` value.
    ///
    /// Returns `Ok(None)` when no feature produced a rule or the rules don't
    /// intersect `bounds`.
    ///
    /// # Errors
    /// - `DuplicateId` if two features resolve to the same id
    /// - `NoPolygonBounds` if rules were accepted but their polygons span no area
    /// - errors from constructing the lookup (`InvalidResolution`)
    pub fn build(
        &self,
        id_property: &str,
        factory: &dyn SpatialRuleFactory,
        features: &FeatureCollection,
        bounds: &BBox,
        options: LookupOptions,
    ) -> Result<Option<SpatialRuleLookupArray>> {
        let mut rule_set = RuleSet::new();

        for (index, feature) in features.features().iter().enumerate() {
            let Some(polygons) = feature.polygons() else {
                self.observer.feature_skipped(index);
                continue;
            };

            let id = match feature.property_str(id_property) {
                Some(id) if !id.is_empty() => id.to_string(),
                _ => {
                    let id = rule_set.next_unknown_id();
                    self.observer.unknown_id_assigned(index, &id);
                    id
                }
            };

            rule_set.claim_id(&id, id_property)?;

            let Some(rule) = factory.create_spatial_rule(&id, polygons) else {
                self.observer.rule_not_applicable(&id);
                continue;
            };

            self.observer.rule_accepted(&rule);
            rule_set.accept(rule);
        }

        if rule_set.rules.is_empty() {
            self.observer.lookup_skipped(SkipReason::NoRules);
            return Ok(None);
        }

        if !rule_set.bounds.is_valid() {
            return Err(SpatialRuleError::NoPolygonBounds {
                rules: rule_set.rules.iter().map(|r| r.id()).join(", "),
            });
        }

        // Only create a lookup if there are rules inside the requested bounds
        let Some(calculated_bounds) = rule_set.bounds.intersection(bounds) else {
            self.observer.lookup_skipped(SkipReason::OutsideBounds);
            return Ok(None);
        };

        let mut lookup =
            SpatialRuleLookupArray::new(calculated_bounds, options.resolution, options.exact)?;
        for rule in rule_set.rules {
            lookup.add_rule(rule);
        }

        self.observer.lookup_created(lookup.bounds(), lookup.rules());
        Ok(Some(lookup))
    }
}
