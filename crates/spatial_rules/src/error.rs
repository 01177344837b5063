use thiserror::Error;

pub type Result<T> = std::result::Result<T, SpatialRuleError>;

#[derive(Debug, Error)]
pub enum SpatialRuleError {
    #[error("You have to pass at least one rule")]
    EmptyRuleList,

    #[error("Cannot find SpatialRule for rule {name}")]
    UnknownRule { name: String },

    #[error(
        "The id {id} was already used. Either leave the json property '{property}' empty or use an unique id."
    )]
    DuplicateId { id: String, property: String },

    #[error(
        "No associated polygons found in feature collection for rules [{rules}]"
    )]
    NoPolygonBounds { rules: String },

    #[error("Invalid geometry: {message}")]
    GeometryError { message: String },

    #[error("Invalid GeoJSON: {0}")]
    InvalidGeoJson(String),

    #[error("Invalid bounds: {0}")]
    InvalidBounds(String),

    #[error("Invalid resolution: {0}")]
    InvalidResolution(f64),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<toml::de::Error> for SpatialRuleError {
    fn from(err: toml::de::Error) -> Self {
        SpatialRuleError::Config(format!("TOML parse error: {}", err))
    }
}
