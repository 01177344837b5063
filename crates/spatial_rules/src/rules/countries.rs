//! Built-in rule profiles.
//!
//! Speed values follow the OSM default speed limit tables (km/h). Roads a
//! profile doesn't list keep the caller's fallback.

use super::rule::{Access, RuleProfile, TransportationMode};

/// Profile without any jurisdiction-specific behaviour
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultProfile;

impl RuleProfile for DefaultProfile {}

/// Germany (`DEU`)
#[derive(Debug, Clone, Copy, Default)]
pub struct GermanyProfile;

impl RuleProfile for GermanyProfile {
    fn max_speed(&self, highway: &str, mode: TransportationMode, fallback: f64) -> f64 {
        if !mode.is_motor_vehicle() {
            return fallback;
        }
        let hgv = mode == TransportationMode::Hgv;
        match highway {
            // no general limit on Autobahn
            "motorway" | "trunk" if hgv => 80.0,
            "motorway" | "trunk" => f64::INFINITY,
            "primary" | "secondary" | "tertiary" | "unclassified" if hgv => 60.0,
            "primary" | "secondary" | "tertiary" | "unclassified" => 100.0,
            "residential" => 50.0,
            "living_street" => 7.0,
            _ => fallback,
        }
    }

    fn access(&self, highway: &str, mode: TransportationMode, fallback: Access) -> Access {
        match highway {
            "track" if mode.is_motor_vehicle() => Access::Conditional,
            _ => fallback,
        }
    }
}

/// Austria (`AUT`)
#[derive(Debug, Clone, Copy, Default)]
pub struct AustriaProfile;

impl RuleProfile for AustriaProfile {
    fn max_speed(&self, highway: &str, mode: TransportationMode, fallback: f64) -> f64 {
        if !mode.is_motor_vehicle() {
            return fallback;
        }
        let hgv = mode == TransportationMode::Hgv;
        match highway {
            "motorway" if hgv => 80.0,
            "motorway" => 130.0,
            "trunk" | "primary" | "secondary" | "tertiary" | "unclassified" if hgv => 70.0,
            "trunk" | "primary" | "secondary" | "tertiary" | "unclassified" => 100.0,
            "residential" => 50.0,
            "living_street" => 5.0,
            _ => fallback,
        }
    }

    fn access(&self, highway: &str, mode: TransportationMode, fallback: Access) -> Access {
        match highway {
            "track" if mode.is_motor_vehicle() => Access::No,
            _ => fallback,
        }
    }
}
