use serde::Serialize;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

use crate::api::HttpClient;
use crate::config::AppConfig;
use crate::error::WeatherError;
use crate::geocode::{AddressComponents, LocationResolver};
use crate::models::{ForecastPeriod, Location};
use crate::weather::{ForecastClient, ForecastProduct};

/// A resolved place together with its forecast
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationForecast {
    pub location: Location,
    pub periods: Vec<ForecastPeriod>,
}

impl LocationForecast {
    /// The period covering "now", i.e. the first one the service listed
    pub fn current(&self) -> Option<&ForecastPeriod> {
        self.periods.first()
    }
}

/// Query -> location -> forecast, over one shared HTTP client.
///
/// Holds no mutable state, so one instance can serve concurrent lookups.
/// Dropping a returned future aborts whichever request is in flight.
#[derive(Debug, Clone)]
pub struct WeatherService {
    resolver: LocationResolver,
    forecasts: ForecastClient,
    deadline: Option<Duration>,
}

impl WeatherService {
    pub fn new(config: &AppConfig) -> Result<Self, WeatherError> {
        let http = HttpClient::new(&config.http)?;
        Ok(Self::with_client(http, config))
    }

    pub fn with_client(http: HttpClient, config: &AppConfig) -> Self {
        Self {
            resolver: LocationResolver::new(http.clone(), config),
            forecasts: ForecastClient::new(http, &config.nws),
            deadline: None,
        }
    }

    /// Bound every lookup made through this service by `deadline`
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn resolver(&self) -> &LocationResolver {
        &self.resolver
    }

    pub fn forecasts(&self) -> &ForecastClient {
        &self.forecasts
    }

    pub async fn locate(&self, query: &str) -> Result<Location, WeatherError> {
        self.bounded(self.resolver.resolve(query)).await
    }

    pub async fn lookup(&self, query: &str) -> Result<LocationForecast, WeatherError> {
        self.lookup_product(query, ForecastProduct::Periods).await
    }

    pub async fn lookup_product(
        &self,
        query: &str,
        product: ForecastProduct,
    ) -> Result<LocationForecast, WeatherError> {
        self.bounded(async {
            let location = self.resolver.resolve(query).await?;
            self.fetch_for(location, product).await
        })
        .await
    }

    pub async fn locate_components(
        &self,
        components: &AddressComponents,
    ) -> Result<Location, WeatherError> {
        self.bounded(self.resolver.resolve_components(components)).await
    }

    /// Structured address -> forecast, geocoding and both forecast steps
    /// under the same deadline
    pub async fn lookup_components(
        &self,
        components: &AddressComponents,
        product: ForecastProduct,
    ) -> Result<LocationForecast, WeatherError> {
        self.bounded(async {
            let location = self.resolver.resolve_components(components).await?;
            self.fetch_for(location, product).await
        })
        .await
    }

    /// Skip geocoding for a location the caller already has
    pub async fn forecast_for(
        &self,
        location: Location,
        product: ForecastProduct,
    ) -> Result<LocationForecast, WeatherError> {
        self.bounded(self.fetch_for(location, product)).await
    }

    async fn fetch_for(
        &self,
        location: Location,
        product: ForecastProduct,
    ) -> Result<LocationForecast, WeatherError> {
        let periods = self
            .forecasts
            .get_product_forecast(location.latitude, location.longitude, product)
            .await?;
        Ok(LocationForecast { location, periods })
    }

    async fn bounded<T, F>(&self, fut: F) -> Result<T, WeatherError>
    where
        F: Future<Output = Result<T, WeatherError>>,
    {
        let Some(deadline) = self.deadline else {
            return fut.await;
        };

        debug!("Running lookup with a {:?} deadline", deadline);
        match tokio::time::timeout(deadline, fut).await {
            Ok(result) => result,
            Err(_) => {
                warn!("Lookup exceeded deadline of {:?}", deadline);
                Err(WeatherError::DeadlineExceeded(deadline))
            }
        }
    }
}
