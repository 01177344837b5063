/// GeoJSON property holding the rule identifier
pub const DEFAULT_ID_PROPERTY: &str = "ISO_A3";

/// Prefix for identifiers synthesized for features without one
pub const UNKNOWN_ID_PREFIX: &str = "_unknown_id_";

/// Namespace short rule names are expanded against
pub const DEFAULT_RULE_NAMESPACE: &str = "countries";
pub const NAMESPACE_SEPARATOR: &str = "::";

/// Grid settings (degrees)
pub const DEFAULT_RESOLUTION: f64 = 0.1;

/// Whole-world bounds: min_lon, max_lon, min_lat, max_lat
pub const WORLD_BOUNDS: (f64, f64, f64, f64) = (-180.0, 180.0, -90.0, 90.0);

/// Environment override for the feature file
pub const ENV_FEATURES_PATH: &str = "SPATIAL_RULES_FEATURES";

/// Upper bound for lat cells x lon cells of one lookup grid
pub const MAX_GRID_CELLS: u64 = 100_000_000;
