pub mod noaa;

use std::fmt;

pub use noaa::{ForecastClient, PointMetadata};

/// Which forecast product to follow from the point metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ForecastProduct {
    /// Twelve-hour day/night periods (`forecast`)
    #[default]
    Periods,
    /// One period per hour (`forecastHourly`)
    Hourly,
}

impl fmt::Display for ForecastProduct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ForecastProduct::Periods => f.write_str("forecast"),
            ForecastProduct::Hourly => f.write_str("hourly forecast"),
        }
    }
}
