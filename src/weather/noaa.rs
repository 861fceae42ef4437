use chrono::{DateTime, FixedOffset};
use serde::Deserialize;
use tracing::{debug, info};

use super::ForecastProduct;
use crate::api::{endpoints, HttpClient};
use crate::config::NwsConfig;
use crate::error::{Endpoint, WeatherError};
use crate::models::ForecastPeriod;

const GEO_JSON: &str = "application/geo+json";

/// National Weather Service client (api.weather.gov).
/// No API key required, just the User-Agent carried by the shared client.
///
/// Every forecast takes two requests: `/points/{lat},{lon}` names the
/// forecast URLs for that grid cell, then the chosen URL is fetched as-is.
#[derive(Debug, Clone)]
pub struct ForecastClient {
    http: HttpClient,
    base_url: String,
}

/// Forecast links the weather service offers for one point
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointMetadata {
    pub forecast: Option<String>,
    pub forecast_hourly: Option<String>,
    pub forecast_grid_data: Option<String>,
}

impl PointMetadata {
    pub fn url_for(&self, product: ForecastProduct) -> Option<&str> {
        let url = match product {
            ForecastProduct::Periods => self.forecast.as_deref(),
            ForecastProduct::Hourly => self.forecast_hourly.as_deref(),
        };
        url.filter(|u| !u.trim().is_empty())
    }
}

#[derive(Debug, Deserialize)]
struct PointsResponse {
    properties: Option<PointMetadata>,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    properties: Option<ForecastProperties>,
}

#[derive(Debug, Deserialize)]
struct ForecastProperties {
    periods: Option<Vec<RawPeriod>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPeriod {
    number: i32,
    name: String,
    start_time: DateTime<FixedOffset>,
    end_time: DateTime<FixedOffset>,
    is_daytime: bool,
    temperature: i32,
    temperature_unit: String,
    #[serde(default)]
    wind_speed: String,
    #[serde(default)]
    wind_direction: String,
    icon: Option<String>,
    short_forecast: String,
    #[serde(default)]
    detailed_forecast: String,
    relative_humidity: Option<QuantitativeValue>,
}

/// `{"unitCode": "wmoUnit:percent", "value": 68}`
#[derive(Debug, Deserialize)]
struct QuantitativeValue {
    value: Option<i32>,
}

impl From<RawPeriod> for ForecastPeriod {
    fn from(raw: RawPeriod) -> Self {
        ForecastPeriod {
            sequence_number: raw.number,
            label: raw.name,
            start_time: raw.start_time,
            end_time: raw.end_time,
            is_daytime: raw.is_daytime,
            temperature: raw.temperature,
            temperature_unit: raw.temperature_unit,
            wind_speed: raw.wind_speed,
            wind_direction: raw.wind_direction,
            icon_ref: raw.icon,
            short_summary: raw.short_forecast,
            detailed_summary: raw.detailed_forecast,
            relative_humidity_percent: raw.relative_humidity.and_then(|h| h.value),
        }
    }
}

impl ForecastClient {
    pub fn new(http: HttpClient, config: &NwsConfig) -> Self {
        Self {
            http,
            base_url: config.base_url.clone(),
        }
    }

    /// Ordered day/night periods for a point, exactly as the service lists them
    pub async fn get_forecast(&self, lat: f64, lon: f64) -> Result<Vec<ForecastPeriod>, WeatherError> {
        self.get_product_forecast(lat, lon, ForecastProduct::Periods).await
    }

    pub async fn get_product_forecast(
        &self,
        lat: f64,
        lon: f64,
        product: ForecastProduct,
    ) -> Result<Vec<ForecastPeriod>, WeatherError> {
        // Step 1: find the forecast URL for this grid cell
        let point = self.get_point(lat, lon).await?;
        let forecast_url = point.url_for(product).ok_or_else(|| {
            debug!("No {} URL offered for ({:.4}, {:.4})", product, lat, lon);
            WeatherError::ForecastUnavailable
        })?;

        // Step 2: fetch the document the service pointed us at
        let periods = self.fetch_periods(forecast_url).await?;
        info!(
            "Fetched {} {} periods for ({:.4}, {:.4})",
            periods.len(),
            product,
            lat,
            lon
        );
        Ok(periods)
    }

    pub async fn get_point(&self, lat: f64, lon: f64) -> Result<PointMetadata, WeatherError> {
        let url = format!(
            "{}/{}",
            endpoints::join(&self.base_url, endpoints::NWS_POINTS),
            point_path(lat, lon)
        );

        debug!("NWS points request: {}", url);
        let request = self.http.get(&url).header(reqwest::header::ACCEPT, GEO_JSON);
        let points: PointsResponse = self.http.get_json(request, Endpoint::PointMetadata).await?;

        points.properties.ok_or(WeatherError::EmptyResponse {
            endpoint: Endpoint::PointMetadata,
        })
    }

    async fn fetch_periods(&self, forecast_url: &str) -> Result<Vec<ForecastPeriod>, WeatherError> {
        debug!("NWS forecast request: {}", forecast_url);
        let request = self
            .http
            .get(forecast_url)
            .header(reqwest::header::ACCEPT, GEO_JSON);
        let forecast: ForecastResponse = self.http.get_json(request, Endpoint::ForecastDocument).await?;

        let periods = forecast
            .properties
            .and_then(|p| p.periods)
            .ok_or(WeatherError::EmptyResponse {
                endpoint: Endpoint::ForecastDocument,
            })?;

        Ok(periods.into_iter().map(ForecastPeriod::from).collect())
    }
}

/// `lat,lon` at four decimals. Values that round to zero are written as
/// `0.0000`, never `-0.0000`.
fn point_path(lat: f64, lon: f64) -> String {
    format!("{},{}", four_places(lat), four_places(lon))
}

fn four_places(value: f64) -> String {
    let formatted = format!("{:.4}", value);
    match formatted.strip_prefix('-') {
        Some(digits) if digits.bytes().all(|b| b == b'0' || b == b'.') => digits.to_string(),
        _ => formatted,
    }
}
