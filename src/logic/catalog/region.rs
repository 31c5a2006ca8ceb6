//! Predefined regions and selection resolution.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::USER_LOCATION_LABEL;
use crate::logic::geolocation::Location;

/// Geographic bounding box in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub min_lng: f64,
    pub max_lat: f64,
    pub max_lng: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegionKey {
    California,
    Alaska,
    Yellowstone,
    NewMadrid,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    pub key: RegionKey,
    pub name: &'static str,
    pub center: Location,
    pub bbox: BoundingBox,
}

/// Region used when the user location is unknown
pub const FALLBACK_REGION: RegionKey = RegionKey::California;

pub const REGIONS: [Region; 4] = [
    Region {
        key: RegionKey::California,
        name: "California",
        center: Location::new(36.7783, -119.4179),
        bbox: BoundingBox { min_lat: 32.0, min_lng: -125.0, max_lat: 42.0, max_lng: -114.0 },
    },
    Region {
        key: RegionKey::Alaska,
        name: "Alaska",
        center: Location::new(64.0685, -152.2782),
        bbox: BoundingBox { min_lat: 54.0, min_lng: -179.0, max_lat: 71.0, max_lng: -129.0 },
    },
    Region {
        key: RegionKey::Yellowstone,
        name: "Yellowstone",
        center: Location::new(44.6, -110.5),
        bbox: BoundingBox { min_lat: 44.0, min_lng: -111.0, max_lat: 45.0, max_lng: -109.0 },
    },
    Region {
        key: RegionKey::NewMadrid,
        name: "New Madrid",
        center: Location::new(36.5861, -89.5889),
        bbox: BoundingBox { min_lat: 35.0, min_lng: -91.0, max_lat: 38.0, max_lng: -88.0 },
    },
];

impl RegionKey {
    pub fn region(self) -> &'static Region {
        match self {
            Self::California => &REGIONS[0],
            Self::Alaska => &REGIONS[1],
            Self::Yellowstone => &REGIONS[2],
            Self::NewMadrid => &REGIONS[3],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::California => "california",
            Self::Alaska => "alaska",
            Self::Yellowstone => "yellowstone",
            Self::NewMadrid => "newmadrid",
        }
    }
}

impl fmt::Display for RegionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown region: {0}")]
pub struct UnknownRegion(pub String);

impl FromStr for RegionKey {
    type Err = UnknownRegion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "california" => Ok(Self::California),
            "alaska" => Ok(Self::Alaska),
            "yellowstone" => Ok(Self::Yellowstone),
            "newmadrid" | "new_madrid" | "new-madrid" => Ok(Self::NewMadrid),
            other => Err(UnknownRegion(other.to_string())),
        }
    }
}

// ============================================================================
// SELECTION
// ============================================================================

/// What the dashboard is looking at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "region", rename_all = "snake_case")]
pub enum Selection {
    UserLocation,
    Region(RegionKey),
}

impl Default for Selection {
    fn default() -> Self {
        Self::UserLocation
    }
}

impl FromStr for Selection {
    type Err = UnknownRegion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "user" | "" => Ok(Self::UserLocation),
            other => other.parse().map(Self::Region),
        }
    }
}

/// Shape of the catalog search
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum QueryArea {
    Around(Location),
    Within(BoundingBox),
}

/// A selection resolved against the (optional) user location
#[derive(Debug, Clone, PartialEq)]
pub struct Target {
    pub area: QueryArea,
    pub center: Location,
    pub label: String,
}

impl Selection {
    /// Resolve to a concrete query target; an unknown user position falls back to California
    pub fn resolve(self, user_location: Option<Location>) -> Target {
        match (self, user_location) {
            (Self::UserLocation, Some(location)) => Target {
                area: QueryArea::Around(location),
                center: location,
                label: USER_LOCATION_LABEL.to_string(),
            },
            (Self::UserLocation, None) => Self::Region(FALLBACK_REGION).resolve(None),
            (Self::Region(key), _) => {
                let region = key.region();
                Target {
                    area: QueryArea::Within(region.bbox),
                    center: region.center,
                    label: region.name.to_string(),
                }
            }
        }
    }
}
