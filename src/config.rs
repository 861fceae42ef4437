use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use crate::api::endpoints;
use crate::error::WeatherError;

/// Config file looked up in the working directory when no path is given
pub const CONFIG_FILE: &str = "weatherfree.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub census: CensusConfig,
    #[serde(default)]
    pub nominatim: NominatimConfig,
    #[serde(default)]
    pub nws: NwsConfig,
}

/// Settings shared by every outbound request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Identification header. Nominatim's usage policy rejects requests without one.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CensusConfig {
    #[serde(default = "default_census_url")]
    pub base_url: String,
    #[serde(default = "default_benchmark")]
    pub benchmark: String,
}

impl Default for CensusConfig {
    fn default() -> Self {
        Self {
            base_url: default_census_url(),
            benchmark: default_benchmark(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NominatimConfig {
    #[serde(default = "default_nominatim_url")]
    pub base_url: String,
    #[serde(default = "default_limit")]
    pub limit: u32,
    /// Appended to ZIP-shaped queries, e.g. "10001" -> "10001, USA"
    #[serde(default = "default_country_qualifier")]
    pub country_qualifier: String,
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self {
            base_url: default_nominatim_url(),
            limit: default_limit(),
            country_qualifier: default_country_qualifier(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NwsConfig {
    #[serde(default = "default_nws_url")]
    pub base_url: String,
}

impl Default for NwsConfig {
    fn default() -> Self {
        Self {
            base_url: default_nws_url(),
        }
    }
}

fn default_timeout() -> u64 { 15 }
fn default_user_agent() -> String {
    format!("weatherfree/{} (contact@example.com)", env!("CARGO_PKG_VERSION"))
}
fn default_census_url() -> String { endpoints::CENSUS_API.to_string() }
fn default_benchmark() -> String { "4".to_string() }
fn default_nominatim_url() -> String { endpoints::NOMINATIM_API.to_string() }
fn default_limit() -> u32 { 1 }
fn default_country_qualifier() -> String { "USA".to_string() }
fn default_nws_url() -> String { endpoints::NWS_API.to_string() }

impl AppConfig {
    /// Load from `path`, or from [`CONFIG_FILE`] if it exists, else defaults.
    /// Environment overrides are applied on top and the result is validated.
    pub fn load(path: Option<&Path>) -> Result<Self, WeatherError> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None if Path::new(CONFIG_FILE).exists() => Self::from_file(Path::new(CONFIG_FILE))?,
            None => {
                debug!("No {} found, using defaults", CONFIG_FILE);
                Self::default()
            }
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, WeatherError> {
        let data = std::fs::read_to_string(path).map_err(|e| {
            WeatherError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        debug!("Loaded config from {}", path.display());
        Self::from_toml(&data)
    }

    pub fn from_toml(data: &str) -> Result<Self, WeatherError> {
        toml::from_str(data).map_err(|e| WeatherError::Config(format!("invalid config: {}", e)))
    }

    /// Apply `WEATHERFREE_*` overrides. `lookup` is `std::env::var` outside tests.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), WeatherError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(ua) = var("WEATHERFREE_USER_AGENT") {
            self.http.user_agent = ua;
        }
        if let Some(secs) = var("WEATHERFREE_TIMEOUT_SECS") {
            self.http.timeout_secs = secs.trim().parse().map_err(|_| {
                WeatherError::Config(format!("WEATHERFREE_TIMEOUT_SECS is not a number: {}", secs))
            })?;
        }
        if let Some(url) = var("WEATHERFREE_CENSUS_URL") {
            self.census.base_url = url;
        }
        if let Some(url) = var("WEATHERFREE_NOMINATIM_URL") {
            self.nominatim.base_url = url;
        }
        if let Some(url) = var("WEATHERFREE_NWS_URL") {
            self.nws.base_url = url;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), WeatherError> {
        if self.http.user_agent.trim().is_empty() {
            return Err(WeatherError::Config("http.user_agent must not be empty".into()));
        }
        if self.http.timeout_secs == 0 {
            return Err(WeatherError::Config("http.timeout_secs must be positive".into()));
        }
        if self.nominatim.limit == 0 {
            return Err(WeatherError::Config("nominatim.limit must be at least 1".into()));
        }
        for (name, url) in [
            ("census.base_url", &self.census.base_url),
            ("nominatim.base_url", &self.nominatim.base_url),
            ("nws.base_url", &self.nws.base_url),
        ] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(WeatherError::Config(format!("{} is not an http(s) URL: {}", name, url)));
            }
        }
        Ok(())
    }
}
