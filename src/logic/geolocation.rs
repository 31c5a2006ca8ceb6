//! Geolocation - where the user is, if we know.
//!
//! The provider is an input collaborator: absence is normal and the
//! pipeline falls back to a predefined region.

use serde::{Deserialize, Serialize};

/// A point on the globe in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Build a location only if both coordinates are finite and in range
    pub fn checked(lat: f64, lng: f64) -> Option<Self> {
        let valid = lat.is_finite()
            && lng.is_finite()
            && (-90.0..=90.0).contains(&lat)
            && (-180.0..=180.0).contains(&lng);
        valid.then(|| Self::new(lat, lng))
    }
}

/// Source of the user's position
pub trait LocationProvider {
    fn current_location(&self) -> Option<Location>;
}

/// Provider returning a known value (or nothing)
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedLocation(pub Option<Location>);

impl LocationProvider for FixedLocation {
    fn current_location(&self) -> Option<Location> {
        self.0
    }
}

pub const USER_LAT_VAR: &str = "QUAKE_USER_LAT";
pub const USER_LNG_VAR: &str = "QUAKE_USER_LNG";

/// Provider reading `QUAKE_USER_LAT` / `QUAKE_USER_LNG`
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvLocation;

impl EnvLocation {
    /// Both values must parse and land in range; anything else is no location
    pub fn parse(lat: Option<&str>, lng: Option<&str>) -> Option<Location> {
        let read = |value: Option<&str>| -> Option<f64> { value?.trim().parse().ok() };

        match (read(lat), read(lng)) {
            (Some(lat), Some(lng)) => {
                let location = Location::checked(lat, lng);
                if location.is_none() {
                    log::warn!("Ignoring out-of-range user location ({}, {})", lat, lng);
                }
                location
            }
            _ => None,
        }
    }
}

impl LocationProvider for EnvLocation {
    fn current_location(&self) -> Option<Location> {
        let lat = std::env::var(USER_LAT_VAR).ok();
        let lng = std::env::var(USER_LNG_VAR).ok();
        Self::parse(lat.as_deref(), lng.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checked_rejects_out_of_range() {
        assert!(Location::checked(36.0, -119.0).is_some());
        assert!(Location::checked(91.0, 0.0).is_none());
        assert!(Location::checked(0.0, -180.5).is_none());
        assert!(Location::checked(f64::NAN, 0.0).is_none());
    }

    #[test]
    fn test_fixed_provider() {
        let here = Location::new(19.43, -99.13);
        assert_eq!(FixedLocation(Some(here)).current_location(), Some(here));
        assert_eq!(FixedLocation(None).current_location(), None);
    }

    #[test]
    fn test_env_values_parse() {
        assert_eq!(
            EnvLocation::parse(Some(" 19.43 "), Some("-99.13")),
            Some(Location::new(19.43, -99.13))
        );
        assert_eq!(EnvLocation::parse(Some("19.43"), None), None);
        assert_eq!(EnvLocation::parse(None, Some("-99.13")), None);
        assert_eq!(EnvLocation::parse(Some("north"), Some("-99.13")), None);
        assert_eq!(EnvLocation::parse(Some("95.0"), Some("-99.13")), None);
        assert_eq!(EnvLocation::parse(Some("NaN"), Some("0")), None);
    }

    // The only test that touches these variables
    #[test]
    fn test_env_provider_reads_variables() {
        std::env::set_var(USER_LAT_VAR, "61.2");
        std::env::set_var(USER_LNG_VAR, "-149.9");
        assert_eq!(EnvLocation.current_location(), Some(Location::new(61.2, -149.9)));

        std::env::remove_var(USER_LNG_VAR);
        assert_eq!(EnvLocation.current_location(), None);

        std::env::remove_var(USER_LAT_VAR);
        assert_eq!(EnvLocation.current_location(), None);
    }
}
