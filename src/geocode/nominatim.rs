//! OpenStreetMap Nominatim search (nominatim.openstreetmap.org).
//!
//! Handles city names, ZIP codes and international places. The search endpoint
//! answers with a bare JSON array rather than an envelope object, and the usage
//! policy requires an identifying User-Agent on every request (set once on the
//! shared [`HttpClient`]).

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::GeocodeOutcome;
use crate::api::{endpoints, HttpClient};
use crate::config::NominatimConfig;
use crate::error::{Endpoint, WeatherError};
use crate::models::Location;

#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    http: HttpClient,
    base_url: String,
    limit: u32,
}

/// One search hit. Coordinates normally arrive as decimal strings; they stay
/// untyped here so a malformed value is reported against this candidate
/// instead of failing the whole list.
#[derive(Debug, Deserialize)]
struct NominatimResult {
    lat: Option<Value>,
    lon: Option<Value>,
    display_name: Option<Value>,
}

impl NominatimGeocoder {
    pub fn new(http: HttpClient, config: &NominatimConfig) -> Self {
        Self {
            http,
            base_url: config.base_url.clone(),
            limit: config.limit,
        }
    }

    /// Search for `query` as given; callers do any rewriting beforehand
    pub async fn search(&self, query: &str) -> GeocodeOutcome {
        let url = endpoints::join(&self.base_url, endpoints::NOMINATIM_SEARCH);
        debug!("Nominatim request: {} (q={})", url, query);

        let limit = self.limit.to_string();
        let request = self.http.get(&url).query(&[
            ("q", query),
            ("format", "json"),
            ("addressdetails", "1"),
            ("limit", limit.as_str()),
        ]);

        match self
            .http
            .get_json::<Vec<Value>>(request, Endpoint::FallbackGeocoder)
            .await
        {
            Ok(results) => to_outcome(results),
            Err(e) => GeocodeOutcome::Failed(e),
        }
    }
}

/// First candidate only; later candidates are never inspected. Absent,
/// malformed or out-of-range coordinates are a `LocationParse` failure,
/// never a zero-valued location.
fn to_outcome(results: Vec<Value>) -> GeocodeOutcome {
    let Some(first) = results.into_iter().next() else {
        return GeocodeOutcome::NoMatch;
    };

    let raw = first.to_string();
    let result = match serde_json::from_value::<NominatimResult>(first) {
        Ok(result) => result,
        Err(e) => {
            debug!("Nominatim candidate is not an object we understand ({}): {}", e, raw);
            return GeocodeOutcome::Failed(WeatherError::LocationParse { candidate: raw });
        }
    };

    let display_name = match result.display_name {
        Some(Value::String(name)) => Some(name),
        _ => None,
    };
    let candidate = display_name.clone().unwrap_or(raw);

    let lat = result.lat.as_ref().and_then(parse_coordinate);
    let lon = result.lon.as_ref().and_then(parse_coordinate);

    let location = match (lat, lon) {
        (Some(lat), Some(lon)) => Location::with_optional_name(lat, lon, display_name),
        _ => None,
    };

    match location {
        Some(location) => GeocodeOutcome::Match(location),
        None => {
            debug!("Nominatim candidate has unusable coordinates: {}", candidate);
            GeocodeOutcome::Failed(WeatherError::LocationParse { candidate })
        }
    }
}

/// Decimal string as sent by the service; a bare JSON number is accepted too
fn parse_coordinate(raw: &Value) -> Option<f64> {
    let value = match raw {
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        Value::Number(n) => n.as_f64()?,
        _ => return None,
    };
    Some(value).filter(|v| v.is_finite())
}
