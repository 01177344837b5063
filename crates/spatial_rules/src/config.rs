use crate::{
    builder::LookupOptions,
    constants::{DEFAULT_ID_PROPERTY, DEFAULT_RESOLUTION, ENV_FEATURES_PATH},
    error::{Result, SpatialRuleError},
    geometry::BBox,
};
use serde::{Deserialize, Serialize};
use std::{
    env,
    path::{Path, PathBuf},
};

/// Main configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub lookup: LookupConfig,
    #[serde(default)]
    pub input: InputConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LookupConfig {
    /// Feature property holding the rule id
    #[serde(default = "default_id_property")]
    pub id_property: String,
    /// Registered rule names; empty = one generic rule per feature
    #[serde(default)]
    pub rules: Vec<String>,
    #[serde(default = "default_resolution")]
    pub resolution: f64,
    #[serde(default)]
    pub exact: bool,
    /// `minLon,maxLon,minLat,maxLat`; whole world if unset
    #[serde(default)]
    pub bounds: Option<String>,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            id_property: default_id_property(),
            rules: Vec::new(),
            resolution: default_resolution(),
            exact: false,
            bounds: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct InputConfig {
    /// GeoJSON FeatureCollection with the borders
    #[serde(default)]
    pub features: Option<PathBuf>,
}

fn default_id_property() -> String {
    DEFAULT_ID_PROPERTY.to_string()
}

fn default_resolution() -> f64 {
    DEFAULT_RESOLUTION
}

impl Config {
    /// Load from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            SpatialRuleError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| {
            SpatialRuleError::Config(format!(
                "Failed to parse config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Environment overrides (feature file path)
    pub fn apply_env(&mut self) {
        if let Ok(features) = env::var(ENV_FEATURES_PATH)
            && !features.trim().is_empty()
        {
            self.input.features = Some(PathBuf::from(features.trim()));
        }
    }

    pub fn validate(&self) -> Result<()> {
        let lookup = &self.lookup;

        if lookup.id_property.trim().is_empty() {
            return Err(SpatialRuleError::Config(
                "id_property cannot be empty".to_string(),
            ));
        }

        if !lookup.resolution.is_finite() || lookup.resolution <= 0.0 {
            return Err(SpatialRuleError::Config(format!(
                "resolution must be a positive number, got {}",
                lookup.resolution
            )));
        }

        if lookup.rules.iter().any(|name| name.trim().is_empty()) {
            return Err(SpatialRuleError::Config(
                "rules cannot contain empty names".to_string(),
            ));
        }

        self.bounds()?;
        Ok(())
    }

    /// Region of interest
    pub fn bounds(&self) -> Result<BBox> {
        match &self.lookup.bounds {
            Some(bounds) => bounds.parse(),
            None => Ok(BBox::world()),
        }
    }

    pub fn lookup_options(&self) -> LookupOptions {
        LookupOptions {
            resolution: self.lookup.resolution,
            exact: self.lookup.exact,
        }
    }

    /// No rule names configured: build one generic rule per feature
    pub fn uses_default_factory(&self) -> bool {
        self.lookup.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.lookup.id_property, "ISO_A3");
        assert_eq!(config.lookup.resolution, DEFAULT_RESOLUTION);
        assert!(config.uses_default_factory());
        assert_eq!(config.bounds().unwrap(), BBox::world());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_full_config() {
        let file = write_config(
            r#"
[lookup]
id_property = "ADM0_A3"
rules = ["GermanySpatialRule", "countries::AustriaSpatialRule"]
resolution = 0.5
exact = true
bounds = "5.8,17.2,46.3,55.1"

[input]
features = "data/countries.geojson"
"#,
        );

        let config = Config::load_from_file(file.path()).unwrap();
        assert_eq!(config.lookup.id_property, "ADM0_A3");
        assert_eq!(config.lookup.rules.len(), 2);
        assert!(!config.uses_default_factory());
        assert_eq!(
            config.lookup_options(),
            LookupOptions {
                resolution: 0.5,
                exact: true
            }
        );
        assert_eq!(config.bounds().unwrap(), BBox::new(5.8, 17.2, 46.3, 55.1));
        assert_eq!(
            config.input.features,
            Some(PathBuf::from("data/countries.geojson"))
        );
    }

    #[test]
    fn test_load_empty_config_uses_defaults() {
        let file = write_config("");
        let config = Config::load_from_file(file.path()).unwrap();
        assert_eq!(config.lookup.id_property, DEFAULT_ID_PROPERTY);
        assert!(config.input.features.is_none());
    }

    #[test]
    fn test_invalid_values_rejected() {
        let file = write_config("[lookup]\nresolution = 0.0\n");
        assert!(matches!(
            Config::load_from_file(file.path()),
            Err(SpatialRuleError::Config(_))
        ));

        let file = write_config("[lookup]\nid_property = \"  \"\n");
        assert!(Config::load_from_file(file.path()).is_err());

        let file = write_config("[lookup]\nrules = [\"GermanySpatialRule\", \"\"]\n");
        assert!(Config::load_from_file(file.path()).is_err());

        let file = write_config("[lookup]\nbounds = \"1,2,3\"\n");
        assert!(matches!(
            Config::load_from_file(file.path()),
            Err(SpatialRuleError::InvalidBounds(_))
        ));
    }

    #[test]
    fn test_malformed_toml() {
        let file = write_config("[lookup\nresolution = ");
        assert!(matches!(
            Config::load_from_file(file.path()),
            Err(SpatialRuleError::Config(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(Config::load_from_file("nonexistent_config.toml").is_err());
    }

    #[test]
    fn test_apply_env() {
        let orig = env::var(ENV_FEATURES_PATH).ok();

        let mut config = Config::default();
        unsafe {
            env::set_var(ENV_FEATURES_PATH, "  borders.geojson ");
        }
        config.apply_env();
        assert_eq!(
            config.input.features,
            Some(PathBuf::from("borders.geojson"))
        );

        let mut config = Config::default();
        unsafe {
            env::set_var(ENV_FEATURES_PATH, "   ");
        }
        config.apply_env();
        assert!(config.input.features.is_none());

        // Cleanup
        unsafe {
            env::remove_var(ENV_FEATURES_PATH);
            if let Some(value) = orig {
                env::set_var(ENV_FEATURES_PATH, value);
            }
        }
    }
}
