pub mod census;
pub mod nominatim;
pub mod query;

use tracing::{debug, info, warn};

use crate::api::HttpClient;
use crate::config::AppConfig;
use crate::error::WeatherError;
use crate::models::Location;

pub use census::{AddressComponents, CensusGeocoder};
pub use nominatim::NominatimGeocoder;

/// What one provider made of a query
#[derive(Debug)]
pub enum GeocodeOutcome {
    Match(Location),
    NoMatch,
    Failed(WeatherError),
}

/// Free text -> one best-guess [`Location`].
///
/// Census first, Nominatim second. The first-ranked match of whichever
/// provider answers is returned as-is; nothing is merged or scored.
#[derive(Debug, Clone)]
pub struct LocationResolver {
    precise: CensusGeocoder,
    fallback: NominatimGeocoder,
    country_qualifier: String,
}

impl LocationResolver {
    pub fn new(http: HttpClient, config: &AppConfig) -> Self {
        Self {
            precise: CensusGeocoder::new(http.clone(), &config.census),
            fallback: NominatimGeocoder::new(http, &config.nominatim),
            country_qualifier: config.nominatim.country_qualifier.clone(),
        }
    }

    pub async fn resolve(&self, query: &str) -> Result<Location, WeatherError> {
        // Blank input never reaches the network
        let trimmed = query::normalize(query)?;
        debug!("Resolving location query: {}", trimmed);

        let precise = self.precise.search(query).await;
        self.finish(query, precise).await
    }

    /// Same policy as [`resolve`](Self::resolve), starting from the Census
    /// component endpoint and falling back with the one-line form
    pub async fn resolve_components(
        &self,
        components: &AddressComponents,
    ) -> Result<Location, WeatherError> {
        query::normalize(&components.street)?;
        let one_line = components.one_line();
        debug!("Resolving address components: {}", one_line);

        let precise = self.precise.search_components(components).await;
        self.finish(&one_line, precise).await
    }

    async fn finish(&self, query: &str, precise: GeocodeOutcome) -> Result<Location, WeatherError> {
        match precise {
            GeocodeOutcome::Match(location) => {
                info!("Census matched '{}' -> {}", query.trim(), location);
                return Ok(location);
            }
            GeocodeOutcome::NoMatch => {
                debug!("Census had no usable match for '{}', falling back", query.trim());
            }
            GeocodeOutcome::Failed(e) => {
                warn!("Census lookup failed for '{}': {}, falling back", query.trim(), e);
            }
        }

        let rewritten = query::fallback_query(query, &self.country_qualifier);
        match self.fallback.search(&rewritten).await {
            GeocodeOutcome::Match(location) => {
                info!("Nominatim matched '{}' -> {}", rewritten, location);
                Ok(location)
            }
            GeocodeOutcome::NoMatch => {
                debug!("Nominatim returned no candidates for '{}'", rewritten);
                Err(no_location(query))
            }
            GeocodeOutcome::Failed(e @ WeatherError::LocationParse { .. }) => Err(e),
            GeocodeOutcome::Failed(e) => {
                warn!("Nominatim lookup failed for '{}': {}", rewritten, e);
                Err(no_location(query))
            }
        }
    }
}

fn no_location(query: &str) -> WeatherError {
    WeatherError::NoLocationFound {
        query: query.trim().to_string(),
    }
}
