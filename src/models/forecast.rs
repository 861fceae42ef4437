use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// One segment ("Tonight", "Monday", or one hour) of a forecast,
/// carried over field-for-field from the weather service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPeriod {
    pub sequence_number: i32,
    pub label: String,
    pub start_time: DateTime<FixedOffset>,
    pub end_time: DateTime<FixedOffset>,
    pub is_daytime: bool,
    pub temperature: i32,
    pub temperature_unit: String,
    pub wind_speed: String,
    pub wind_direction: String,
    pub icon_ref: Option<String>,
    pub short_summary: String,
    pub detailed_summary: String,
    pub relative_humidity_percent: Option<i32>,
}

impl ForecastPeriod {
    /// e.g. "72°F"
    pub fn format_temperature(&self) -> String {
        format!("{}°{}", self.temperature, self.temperature_unit)
    }

    /// e.g. "10 mph SW"
    pub fn format_wind(&self) -> String {
        match (self.wind_speed.is_empty(), self.wind_direction.is_empty()) {
            (true, _) => String::new(),
            (false, true) => self.wind_speed.clone(),
            (false, false) => format!("{} {}", self.wind_speed, self.wind_direction),
        }
    }
}
