use super::{RuleRegistry, SpatialRuleFactory};
use crate::error::{Result, SpatialRuleError};
use crate::geometry::Polygon;
use crate::rules::SpatialRule;

use log::error;
use std::collections::HashMap;
use std::sync::Arc;

/// Factory backed by a fixed set of rules keyed by their id.
///
/// `create_spatial_rule` hands out the stored instance itself, so borders
/// attached by one build replace those of the previous one.
#[derive(Debug, Default)]
pub struct SpatialRuleListFactory {
    rules: HashMap<String, Arc<SpatialRule>>,
}

impl SpatialRuleListFactory {
    /// From already constructed rules. A later rule replaces an earlier one with the same id.
    pub fn from_rules<I>(rules: I) -> Self
    where
        I: IntoIterator<Item = SpatialRule>,
    {
        let rules = rules
            .into_iter()
            .map(|rule| (rule.id().to_string(), Arc::new(rule)))
            .collect();
        Self { rules }
    }

    /// Resolves every name through `registry`
    ///
    /// # Errors
    /// - `EmptyRuleList` if `names` is empty
    /// - `UnknownRule` for the first name the registry cannot resolve
    pub fn from_names<S: AsRef<str>>(registry: &RuleRegistry, names: &[S]) -> Result<Self> {
        if names.is_empty() {
            return Err(SpatialRuleError::EmptyRuleList);
        }

        let rules = names
            .iter()
            .map(|name| {
                registry.resolve(name.as_ref()).inspect_err(|e| {
                    error!("{e}");
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self::from_rules(rules))
    }

    /// Comma-separated names, e.g. `"GermanySpatialRule,AustriaSpatialRule"`.
    /// Blank entries are ignored.
    pub fn from_name_list(registry: &RuleRegistry, names: &str) -> Result<Self> {
        let names: Vec<&str> = names
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .collect();
        Self::from_names(registry, &names)
    }

    pub fn rule(&self, id: &str) -> Option<&Arc<SpatialRule>> {
        self.rules.get(id)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl SpatialRuleFactory for SpatialRuleListFactory {
    fn create_spatial_rule(&self, id: &str, polygons: &[Polygon]) -> Option<Arc<SpatialRule>> {
        let rule = self.rules.get(id)?;
        rule.set_borders(polygons.to_vec());
        Some(Arc::clone(rule))
    }
}
