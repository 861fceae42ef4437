use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use crate::config::HttpConfig;
use crate::error::{Endpoint, WeatherError};

/// The one HTTP transport shared by every provider adapter.
/// Cloning is cheap; all clones share the same connection pool.
#[derive(Debug, Clone)]
pub struct HttpClient {
    http: Client,
}

impl HttpClient {
    pub fn new(config: &HttpConfig) -> Result<Self, WeatherError> {
        let http = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| WeatherError::Config(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self { http })
    }

    pub fn get(&self, url: &str) -> RequestBuilder {
        self.http.get(url)
    }

    /// Send `request` and decode a JSON body, attributing any failure to `endpoint`
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        endpoint: Endpoint,
    ) -> Result<T, WeatherError> {
        let response = request
            .send()
            .await
            .map_err(|source| WeatherError::Transport { endpoint, source })?;

        let status = response.status();
        debug!("{} responded {}", endpoint, status);
        if !status.is_success() {
            return Err(WeatherError::Upstream {
                endpoint,
                status_code: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|source| WeatherError::Transport { endpoint, source })?;

        decode_body(&body, endpoint)
    }
}

/// Empty and `null` bodies are [`WeatherError::EmptyResponse`], anything else
/// that doesn't fit `T` is [`WeatherError::Decode`]
fn decode_body<T: DeserializeOwned>(body: &str, endpoint: Endpoint) -> Result<T, WeatherError> {
    let trimmed = body.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Err(WeatherError::EmptyResponse { endpoint });
    }

    serde_json::from_str(trimmed).map_err(|e| WeatherError::Decode {
        endpoint,
        message: e.to_string(),
    })
}
