use super::countries::DefaultProfile;
use crate::geometry::Polygon;

use std::fmt;
use std::sync::{PoisonError, RwLock, RwLockReadGuard};
use strum_macros::{Display, EnumIter, EnumString};

/// Means of transport a rule is asked about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum TransportationMode {
    Foot,
    Bike,
    Motorcycle,
    Car,
    Hgv,
}

impl TransportationMode {
    pub fn is_motor_vehicle(self) -> bool {
        matches!(
            self,
            TransportationMode::Motorcycle | TransportationMode::Car | TransportationMode::Hgv
        )
    }
}

/// Legal access of a road for a given means of transport
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Access {
    Yes,
    Conditional,
    Private,
    No,
}

/// Jurisdiction-specific behaviour of a rule.
///
/// Both methods receive the OSM `highway` tag value and a fallback that the
/// caller would use without any rule; profiles return the fallback for
/// anything they don't regulate.
pub trait RuleProfile: fmt::Debug + Send + Sync {
    fn max_speed(&self, _highway: &str, _mode: TransportationMode, fallback: f64) -> f64 {
        fallback
    }

    fn access(&self, _highway: &str, _mode: TransportationMode, fallback: Access) -> Access {
        fallback
    }
}

/// A rule governing the area inside its borders.
///
/// Borders are assigned after construction and may be replaced when a
/// registry hands the same rule out again.
#[derive(Debug)]
pub struct SpatialRule {
    id: String,
    borders: RwLock<Vec<Polygon>>,
    profile: Box<dyn RuleProfile>,
}

impl SpatialRule {
    /// Generic rule with the default profile
    pub fn new(id: impl Into<String>, borders: Vec<Polygon>) -> Self {
        Self {
            id: id.into(),
            borders: RwLock::new(borders),
            profile: Box::new(DefaultProfile),
        }
    }

    /// Rule with a specific profile and no borders yet
    pub fn with_profile(id: impl Into<String>, profile: impl RuleProfile + 'static) -> Self {
        Self {
            id: id.into(),
            borders: RwLock::new(Vec::new()),
            profile: Box::new(profile),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn borders(&self) -> RwLockReadGuard<'_, Vec<Polygon>> {
        self.borders.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replaces the borders
    pub fn set_borders(&self, polygons: Vec<Polygon>) {
        *self.borders.write().unwrap_or_else(PoisonError::into_inner) = polygons;
    }

    /// True if any border polygon contains the point
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        self.borders().iter().any(|p| p.contains(lat, lon))
    }

    pub fn max_speed(&self, highway: &str, mode: TransportationMode, fallback: f64) -> f64 {
        self.profile.max_speed(highway, mode, fallback)
    }

    pub fn access(&self, highway: &str, mode: TransportationMode, fallback: Access) -> Access {
        self.profile.access(highway, mode, fallback)
    }
}

impl fmt::Display for SpatialRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}
