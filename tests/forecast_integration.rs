//! Integration tests for ForecastClient and WeatherService using wiremock.

use std::time::Duration;

use weatherfree::{
    AddressComponents, AppConfig, Endpoint, ForecastClient, ForecastProduct, HttpClient, Location, WeatherError,
    WeatherService,
};
use wiremock::matchers::{header, method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

const POINT_PATH: &str = "/points/40.7128,-74.0060";
const FORECAST_PATH: &str = "/gridpoints/OKX/33,35/forecast";
const HOURLY_PATH: &str = "/gridpoints/OKX/33,35/forecast/hourly";

fn config_for(server: &MockServer) -> AppConfig {
    let mut config = AppConfig::default();
    config.http.user_agent = "weatherfree-tests/1.0 (tests@example.com)".to_string();
    config.census.base_url = format!("{}/geocoder", server.uri());
    config.nominatim.base_url = format!("{}/nominatim", server.uri());
    config.nws.base_url = server.uri();
    config
}

fn client_for(server: &MockServer) -> ForecastClient {
    let config = config_for(server);
    let http = HttpClient::new(&config.http).unwrap();
    ForecastClient::new(http, &config.nws)
}

fn points_body(server: &MockServer) -> serde_json::Value {
    serde_json::json!({
        "@context": ["https://geojson.org/geojson-ld/geojson-context.jsonld"],
        "type": "Feature",
        "properties": {
            "gridId": "OKX",
            "gridX": 33,
            "gridY": 35,
            "forecast": format!("{}{}", server.uri(), FORECAST_PATH),
            "forecastHourly": format!("{}{}", server.uri(), HOURLY_PATH),
            "forecastGridData": format!("{}/gridpoints/OKX/33,35", server.uri())
        }
    })
}

/// Twelve-hour periods starting at 06:00 on 2026-10-19, alternating day/night
fn test_period(number: i32) -> serde_json::Value {
    let start_hour = 6 + 12 * (number - 1) as i64;
    let start = chrono::DateTime::parse_from_rfc3339("2026-10-19T00:00:00-04:00").unwrap()
        + chrono::Duration::hours(start_hour);
    let end = start + chrono::Duration::hours(12);
    let is_daytime = number % 2 == 1;
    let temperature = if number == 1 { 72 } else { 50 + number };

    serde_json::json!({
        "number": number,
        "name": format!("Period {}", number),
        "startTime": start.to_rfc3339(),
        "endTime": end.to_rfc3339(),
        "isDaytime": is_daytime,
        "temperature": temperature,
        "temperatureUnit": "F",
        "temperatureTrend": null,
        "probabilityOfPrecipitation": {"unitCode": "wmoUnit:percent", "value": null},
        "relativeHumidity": {"unitCode": "wmoUnit:percent", "value": 40 + number},
        "windSpeed": "5 to 10 mph",
        "windDirection": "SW",
        "icon": format!("https://api.weather.gov/icons/land/day/skc?size=medium&n={}", number),
        "shortForecast": "Sunny",
        "detailedForecast": format!("Details for period {}.", number)
    })
}

fn forecast_body(numbers: impl IntoIterator<Item = i32>) -> serde_json::Value {
    let periods: Vec<_> = numbers.into_iter().map(test_period).collect();
    serde_json::json!({
        "type": "Feature",
        "properties": {
            "units": "us",
            "forecastGenerator": "BaselineForecastGenerator",
            "periods": periods
        }
    })
}

async fn mount_points(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(POINT_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_fourteen_periods_in_order() {
    let mock_server = MockServer::start().await;
    mount_points(&mock_server, points_body(&mock_server)).await;

    Mock::given(method("GET"))
        .and(path(FORECAST_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body(1..=14)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let periods = client.get_forecast(40.7128, -74.0060).await.unwrap();

    assert_eq!(periods.len(), 14);
    let numbers: Vec<i32> = periods.iter().map(|p| p.sequence_number).collect();
    assert_eq!(numbers, (1..=14).collect::<Vec<_>>());

    let first = &periods[0];
    assert_eq!(first.label, "Period 1");
    assert_eq!(first.temperature, 72);
    assert_eq!(first.temperature_unit, "F");
    assert!(first.is_daytime);
    assert_eq!(first.wind_speed, "5 to 10 mph");
    assert_eq!(first.wind_direction, "SW");
    assert_eq!(first.short_summary, "Sunny");
    assert_eq!(first.detailed_summary, "Details for period 1.");
    assert_eq!(first.relative_humidity_percent, Some(41));
    assert_eq!(first.start_time.to_rfc3339(), "2026-10-19T06:00:00-04:00");
    assert_eq!(first.end_time.to_rfc3339(), "2026-10-19T18:00:00-04:00");
}

#[tokio::test]
async fn test_upstream_order_is_not_resorted() {
    let mock_server = MockServer::start().await;
    mount_points(&mock_server, points_body(&mock_server)).await;

    Mock::given(method("GET"))
        .and(path(FORECAST_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body([3, 1, 2, 2])))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let periods = client.get_forecast(40.7128, -74.0060).await.unwrap();

    let numbers: Vec<i32> = periods.iter().map(|p| p.sequence_number).collect();
    assert_eq!(numbers, vec![3, 1, 2, 2]);
}

#[tokio::test]
async fn test_missing_forecast_url_is_unavailable() {
    let mock_server = MockServer::start().await;
    mount_points(
        &mock_server,
        serde_json::json!({"properties": {"forecast": null, "forecastHourly": null}}),
    )
    .await;

    Mock::given(path_regex("^/gridpoints/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body(1..=2)))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client.get_forecast(40.7128, -74.0060).await.unwrap_err();
    assert!(matches!(err, WeatherError::ForecastUnavailable));
}

#[tokio::test]
async fn test_point_outside_coverage() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/points/51.5074,-0.1278"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "title": "Data Unavailable For Requested Point",
            "status": 404
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client.get_forecast(51.5074, -0.1278).await.unwrap_err();
    assert!(matches!(
        err,
        WeatherError::Upstream {
            endpoint: Endpoint::PointMetadata,
            status_code: 404
        }
    ));
}

#[tokio::test]
async fn test_step_failures_are_distinguishable() {
    let mock_server = MockServer::start().await;
    mount_points(&mock_server, points_body(&mock_server)).await;

    Mock::given(method("GET"))
        .and(path(FORECAST_PATH))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client.get_forecast(40.7128, -74.0060).await.unwrap_err();
    assert!(matches!(
        err,
        WeatherError::Upstream {
            endpoint: Endpoint::ForecastDocument,
            status_code: 503
        }
    ));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_empty_point_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(POINT_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(""))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client.get_forecast(40.7128, -74.0060).await.unwrap_err();
    assert_eq!(err.endpoint(), Some(Endpoint::PointMetadata));
    assert!(matches!(err, WeatherError::EmptyResponse { .. }));
}

#[tokio::test]
async fn test_point_without_properties_is_empty() {
    let mock_server = MockServer::start().await;
    mount_points(&mock_server, serde_json::json!({})).await;

    let client = client_for(&mock_server);
    let err = client.get_forecast(40.7128, -74.0060).await.unwrap_err();
    assert!(matches!(
        err,
        WeatherError::EmptyResponse {
            endpoint: Endpoint::PointMetadata
        }
    ));
}

#[tokio::test]
async fn test_forecast_null_body_is_empty() {
    let mock_server = MockServer::start().await;
    mount_points(&mock_server, points_body(&mock_server)).await;

    Mock::given(method("GET"))
        .and(path(FORECAST_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("null"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client.get_forecast(40.7128, -74.0060).await.unwrap_err();
    assert!(matches!(
        err,
        WeatherError::EmptyResponse {
            endpoint: Endpoint::ForecastDocument
        }
    ));
}

#[tokio::test]
async fn test_transport_failure() {
    let mut config = AppConfig::default();
    // Nothing listens on the discard port
    config.nws.base_url = "http://127.0.0.1:9".to_string();
    config.http.timeout_secs = 2;
    let http = HttpClient::new(&config.http).unwrap();
    let client = ForecastClient::new(http, &config.nws);

    let err = client.get_forecast(40.7128, -74.0060).await.unwrap_err();
    assert!(matches!(
        err,
        WeatherError::Transport {
            endpoint: Endpoint::PointMetadata,
            ..
        }
    ));
}

#[tokio::test]
async fn test_requests_ask_for_geojson() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(POINT_PATH))
        .and(header("accept", "application/geo+json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(points_body(&mock_server)))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(FORECAST_PATH))
        .and(header("accept", "application/geo+json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body(1..=2)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    assert_eq!(client.get_forecast(40.7128, -74.0060).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_repeated_calls_are_identical() {
    let mock_server = MockServer::start().await;
    mount_points(&mock_server, points_body(&mock_server)).await;

    Mock::given(method("GET"))
        .and(path(FORECAST_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body(1..=14)))
        .expect(2)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let first = client.get_forecast(40.7128, -74.0060).await.unwrap();
    let second = client.get_forecast(40.7128, -74.0060).await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_hourly_product_follows_hourly_url() {
    let mock_server = MockServer::start().await;
    mount_points(&mock_server, points_body(&mock_server)).await;

    Mock::given(method("GET"))
        .and(path(HOURLY_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body(1..=48)))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(FORECAST_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body(1..=14)))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let periods = client
        .get_product_forecast(40.7128, -74.0060, ForecastProduct::Hourly)
        .await
        .unwrap();
    assert_eq!(periods.len(), 48);
}

#[tokio::test]
async fn test_point_metadata_exposes_all_links() {
    let mock_server = MockServer::start().await;
    mount_points(&mock_server, points_body(&mock_server)).await;

    let client = client_for(&mock_server);
    let point = client.get_point(40.7128, -74.0060).await.unwrap();
    assert_eq!(
        point.forecast_grid_data,
        Some(format!("{}/gridpoints/OKX/33,35", mock_server.uri()))
    );
    assert!(point.forecast_hourly.is_some());
}

#[tokio::test]
async fn test_service_lookup_end_to_end() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/geocoder/locations/onelineaddress"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "result": {"addressMatches": []}
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/nominatim/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"lat": "40.7128", "lon": "-74.0060", "display_name": "New York, NY"}
        ])))
        .mount(&mock_server)
        .await;

    mount_points(&mock_server, points_body(&mock_server)).await;

    Mock::given(method("GET"))
        .and(path(FORECAST_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body(1..=14)))
        .mount(&mock_server)
        .await;

    let service = WeatherService::new(&config_for(&mock_server)).unwrap();
    let result = service.lookup("New York").await.unwrap();

    assert_eq!(result.location, Location::new(40.7128, -74.0060, "New York, NY").unwrap());
    assert_eq!(result.periods.len(), 14);
    assert_eq!(result.current().map(|p| p.temperature), Some(72));
}

#[tokio::test]
async fn test_service_concurrent_lookups() {
    let mock_server = MockServer::start().await;
    mount_points(&mock_server, points_body(&mock_server)).await;

    Mock::given(method("GET"))
        .and(path(FORECAST_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body(1..=14)))
        .expect(2)
        .mount(&mock_server)
        .await;

    let service = WeatherService::new(&config_for(&mock_server)).unwrap();
    let location = Location::new(40.7128, -74.0060, "New York, NY").unwrap();

    let (a, b) = tokio::join!(
        service.forecast_for(location.clone(), ForecastProduct::Periods),
        service.forecast_for(location.clone(), ForecastProduct::Periods),
    );
    assert_eq!(a.unwrap(), b.unwrap());
}

#[tokio::test]
async fn test_deadline_stops_before_second_step() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(POINT_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(points_body(&mock_server))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(FORECAST_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body(1..=14)))
        .expect(0)
        .mount(&mock_server)
        .await;

    let service = WeatherService::new(&config_for(&mock_server))
        .unwrap()
        .with_deadline(Duration::from_millis(200));
    let location = Location::new(40.7128, -74.0060, "New York, NY").unwrap();

    let err = service
        .forecast_for(location, ForecastProduct::Periods)
        .await
        .unwrap_err();
    assert!(matches!(err, WeatherError::DeadlineExceeded(_)));
}

#[tokio::test]
async fn test_deadline_covers_component_geocoding() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/geocoder/locations/address"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"result": {"addressMatches": []}}))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;

    Mock::given(path_regex("^/(nominatim|points)/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let service = WeatherService::new(&config_for(&mock_server))
        .unwrap()
        .with_deadline(Duration::from_millis(200));
    let components = AddressComponents {
        street: "4600 Silver Hill Rd".to_string(),
        city: Some("Washington".to_string()),
        state: Some("DC".to_string()),
        zip: None,
    };

    let err = service.locate_components(&components).await.unwrap_err();
    assert!(matches!(err, WeatherError::DeadlineExceeded(_)));

    let err = service
        .lookup_components(&components, ForecastProduct::Periods)
        .await
        .unwrap_err();
    assert!(matches!(err, WeatherError::DeadlineExceeded(_)));
}
