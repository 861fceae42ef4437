use serde::Deserialize;
use tracing::debug;

use super::GeocodeOutcome;
use crate::api::{endpoints, HttpClient};
use crate::config::CensusConfig;
use crate::error::Endpoint;
use crate::models::Location;

/// U.S. Census geocoder (geocoding.geo.census.gov).
/// Street addresses in the U.S., Puerto Rico and island areas only.
#[derive(Debug, Clone)]
pub struct CensusGeocoder {
    http: HttpClient,
    base_url: String,
    benchmark: String,
}

/// Structured address for the component search endpoint.
/// The service needs a street plus either a ZIP or a city and state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AddressComponents {
    pub street: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
}

impl AddressComponents {
    /// "street, city, state zip" with the missing parts left out
    pub fn one_line(&self) -> String {
        let mut parts = vec![self.street.trim().to_string()];
        if let Some(city) = non_blank(&self.city) {
            parts.push(city.to_string());
        }
        match (non_blank(&self.state), non_blank(&self.zip)) {
            (Some(state), Some(zip)) => parts.push(format!("{} {}", state, zip)),
            (Some(state), None) => parts.push(state.to_string()),
            (None, Some(zip)) => parts.push(zip.to_string()),
            (None, None) => {}
        }
        parts.retain(|p| !p.is_empty());
        parts.join(", ")
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

#[derive(Debug, Deserialize)]
struct CensusResponse {
    result: Option<CensusResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CensusResult {
    address_matches: Option<Vec<AddressMatch>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddressMatch {
    coordinates: Option<Coordinates>,
    matched_address: Option<String>,
}

/// x is longitude, y is latitude
#[derive(Debug, Deserialize)]
struct Coordinates {
    x: Option<f64>,
    y: Option<f64>,
}

impl CensusGeocoder {
    pub fn new(http: HttpClient, config: &CensusConfig) -> Self {
        Self {
            http,
            base_url: config.base_url.clone(),
            benchmark: config.benchmark.clone(),
        }
    }

    /// One-line address search; the query is submitted verbatim
    pub async fn search(&self, address: &str) -> GeocodeOutcome {
        let url = endpoints::join(&self.base_url, endpoints::CENSUS_ONELINE);
        debug!("Census one-line request: {} ({})", url, address);

        let request = self.http.get(&url).query(&[
            ("address", address),
            ("benchmark", self.benchmark.as_str()),
            ("format", "json"),
        ]);
        self.fetch(request).await
    }

    /// Component search on `/locations/address`
    pub async fn search_components(&self, components: &AddressComponents) -> GeocodeOutcome {
        let url = endpoints::join(&self.base_url, endpoints::CENSUS_COMPONENTS);
        debug!("Census component request: {} ({:?})", url, components);

        let mut params = vec![("street", components.street.trim())];
        if let Some(city) = non_blank(&components.city) {
            params.push(("city", city));
        }
        if let Some(state) = non_blank(&components.state) {
            params.push(("state", state));
        }
        if let Some(zip) = non_blank(&components.zip) {
            params.push(("zip", zip));
        }
        params.push(("benchmark", self.benchmark.as_str()));
        params.push(("format", "json"));

        let request = self.http.get(&url).query(&params);
        self.fetch(request).await
    }

    async fn fetch(&self, request: reqwest::RequestBuilder) -> GeocodeOutcome {
        match self
            .http
            .get_json::<CensusResponse>(request, Endpoint::PreciseGeocoder)
            .await
        {
            Ok(response) => to_outcome(response),
            Err(e) => GeocodeOutcome::Failed(e),
        }
    }
}

/// First address match, if it has both coordinates inside the valid ranges
fn to_outcome(response: CensusResponse) -> GeocodeOutcome {
    let first = response
        .result
        .and_then(|r| r.address_matches)
        .and_then(|matches| matches.into_iter().next());

    let Some(first) = first else {
        return GeocodeOutcome::NoMatch;
    };

    let (Some(lon), Some(lat)) = (
        first.coordinates.as_ref().and_then(|c| c.x),
        first.coordinates.as_ref().and_then(|c| c.y),
    ) else {
        debug!("Census match has no coordinates: {:?}", first.matched_address);
        return GeocodeOutcome::NoMatch;
    };

    match Location::with_optional_name(lat, lon, first.matched_address) {
        Some(location) => GeocodeOutcome::Match(location),
        None => {
            debug!("Census coordinates out of range: ({}, {})", lat, lon);
            GeocodeOutcome::NoMatch
        }
    }
}
