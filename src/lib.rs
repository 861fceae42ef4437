//! Look up a place, address or ZIP code and fetch its National Weather
//! Service forecast.
//!
//! [`LocationResolver`] tries the U.S. Census geocoder and falls back to
//! Nominatim; [`ForecastClient`] walks the weather service's points ->
//! forecast indirection. [`WeatherService`] chains the two.

pub mod api;
pub mod config;
pub mod error;
pub mod geocode;
pub mod models;
pub mod service;
pub mod weather;

pub use api::HttpClient;
pub use config::AppConfig;
pub use error::{Endpoint, WeatherError};
pub use geocode::{AddressComponents, GeocodeOutcome, LocationResolver};
pub use models::{ForecastPeriod, Location};
pub use service::{LocationForecast, WeatherService};
pub use weather::{ForecastClient, ForecastProduct, PointMetadata};
