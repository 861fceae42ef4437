use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// Upstream endpoint a transport-level failure came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    PreciseGeocoder,
    FallbackGeocoder,
    PointMetadata,
    ForecastDocument,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Endpoint::PreciseGeocoder => "census geocoder",
            Endpoint::FallbackGeocoder => "nominatim geocoder",
            Endpoint::PointMetadata => "point metadata",
            Endpoint::ForecastDocument => "forecast document",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum WeatherError {
    #[error("Query must not be blank")]
    InvalidQuery,

    #[error("No location found for '{query}'")]
    NoLocationFound { query: String },

    #[error("Could not parse coordinates of '{candidate}'")]
    LocationParse { candidate: String },

    #[error("{endpoint} request failed: {source}")]
    Transport {
        endpoint: Endpoint,
        #[source]
        source: reqwest::Error,
    },

    #[error("{endpoint} returned HTTP {status_code}")]
    Upstream { endpoint: Endpoint, status_code: u16 },

    #[error("{endpoint} returned an empty response")]
    EmptyResponse { endpoint: Endpoint },

    #[error("No forecast is offered for this point")]
    ForecastUnavailable,

    #[error("Failed to decode {endpoint} response: {message}")]
    Decode { endpoint: Endpoint, message: String },

    #[error("Lookup did not finish within {0:?}")]
    DeadlineExceeded(Duration),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl WeatherError {
    /// Endpoint the failure is attributed to, if it came from the network layer
    pub fn endpoint(&self) -> Option<Endpoint> {
        match self {
            Self::Transport { endpoint, .. }
            | Self::Upstream { endpoint, .. }
            | Self::EmptyResponse { endpoint }
            | Self::Decode { endpoint, .. } => Some(*endpoint),
            _ => None,
        }
    }

    /// Message suitable for showing next to a retry button
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidQuery => "Enter a city, address or ZIP code.".to_string(),
            Self::NoLocationFound { query } => {
                format!("Couldn't find '{}'. Try a city name or a ZIP code.", query)
            }
            Self::LocationParse { .. } => {
                "The location service returned unreadable coordinates.".to_string()
            }
            Self::Transport { .. } => "Network error. Check your connection.".to_string(),
            Self::Upstream {
                endpoint: Endpoint::PointMetadata,
                status_code: 404,
            } => "Forecasts are only available for U.S. locations.".to_string(),
            Self::Upstream { endpoint, status_code } => {
                format!("The {} service returned an error (HTTP {}).", endpoint, status_code)
            }
            Self::EmptyResponse { endpoint } => {
                format!("The {} service returned no data.", endpoint)
            }
            Self::ForecastUnavailable => {
                "No forecast is available for this location.".to_string()
            }
            Self::Decode { endpoint, .. } => {
                format!("Unexpected response from the {} service.", endpoint)
            }
            Self::DeadlineExceeded(_) => "The request took too long. Please retry.".to_string(),
            Self::Config(msg) => format!("Configuration problem: {}", msg),
        }
    }

    /// Whether repeating the same call could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport { .. } | Self::EmptyResponse { .. } | Self::DeadlineExceeded(_) => true,
            Self::Upstream { status_code, .. } => *status_code == 429 || *status_code >= 500,
            _ => false,
        }
    }
}
