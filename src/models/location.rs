use serde::{Deserialize, Serialize};
use std::fmt;

/// Display name used when a provider returns coordinates without a label
pub const UNKNOWN_LOCATION: &str = "Unknown Location";

/// A resolved point on the map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    pub display_name: String,
}

impl Location {
    /// Build a location, rejecting coordinates outside the WGS84 ranges.
    /// Returns `None` for NaN or out-of-range values.
    pub fn new(latitude: f64, longitude: f64, display_name: impl Into<String>) -> Option<Self> {
        if !is_valid_coordinate(latitude, longitude) {
            return None;
        }
        Some(Self {
            latitude,
            longitude,
            display_name: display_name.into(),
        })
    }

    /// Like [`Location::new`] but substitutes [`UNKNOWN_LOCATION`] for a missing
    /// or blank name
    pub fn with_optional_name(latitude: f64, longitude: f64, name: Option<String>) -> Option<Self> {
        let name = name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| UNKNOWN_LOCATION.to_string());
        Self::new(latitude, longitude, name)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({:.4}, {:.4})",
            self.display_name, self.latitude, self.longitude
        )
    }
}

pub fn is_valid_coordinate(latitude: f64, longitude: f64) -> bool {
    (-90.0..=90.0).contains(&latitude) && (-180.0..=180.0).contains(&longitude)
}
