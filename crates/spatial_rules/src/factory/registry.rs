use crate::constants::{DEFAULT_RULE_NAMESPACE, NAMESPACE_SEPARATOR};
use crate::error::{Result, SpatialRuleError};
use crate::rules::{AustriaProfile, GermanyProfile, SpatialRule};

use std::collections::BTreeMap;
use std::fmt;

pub type RuleConstructor = Box<dyn Fn() -> SpatialRule + Send + Sync>;

/// Name → constructor table used to resolve rule names from configuration.
///
/// Names are stored fully qualified (`namespace::Name`). Lookups without a
/// namespace are expanded against [`DEFAULT_RULE_NAMESPACE`].
#[derive(Default)]
pub struct RuleRegistry {
    constructors: BTreeMap<String, RuleConstructor>,
}

impl RuleRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in country rules
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register("GermanySpatialRule", || {
            SpatialRule::with_profile("DEU", GermanyProfile)
        });
        registry.register("AustriaSpatialRule", || {
            SpatialRule::with_profile("AUT", AustriaProfile)
        });
        registry
    }

    /// Adds or replaces a constructor
    pub fn register<F>(&mut self, name: &str, constructor: F)
    where
        F: Fn() -> SpatialRule + Send + Sync + 'static,
    {
        self.constructors
            .insert(qualify(name), Box::new(constructor));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.constructors.contains_key(&qualify(name))
    }

    /// Builds a new rule instance for `name`
    ///
    /// # Errors
    /// Returns `UnknownRule` if nothing is registered under the (qualified) name
    pub fn resolve(&self, name: &str) -> Result<SpatialRule> {
        let qualified = qualify(name);
        self.constructors
            .get(&qualified)
            .map(|constructor| constructor())
            .ok_or(SpatialRuleError::UnknownRule { name: qualified })
    }

    /// Registered names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.constructors.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.constructors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constructors.is_empty()
    }
}

impl fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleRegistry")
            .field("names", &self.constructors.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// `GermanySpatialRule` -> `countries::GermanySpatialRule`
fn qualify(name: &str) -> String {
    let name = name.trim();
    if name.contains(NAMESPACE_SEPARATOR) {
        name.to_string()
    } else {
        format!("{DEFAULT_RULE_NAMESPACE}{NAMESPACE_SEPARATOR}{name}")
    }
}
