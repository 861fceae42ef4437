use regex::Regex;
use std::sync::LazyLock;

use crate::error::WeatherError;

static ZIP_CODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{5}(-\d{4})?$").expect("ZIP pattern is valid")
});

/// Trimmed query text, or `InvalidQuery` if nothing is left
pub fn normalize(query: &str) -> Result<&str, WeatherError> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return Err(WeatherError::InvalidQuery);
    }
    Ok(trimmed)
}

/// "12345" or "12345-6789"
pub fn is_zip_code(query: &str) -> bool {
    ZIP_CODE.is_match(query.trim())
}

/// Query as submitted to the fallback provider: ZIP codes get the country
/// qualifier appended so they don't match postcodes elsewhere in the world
pub fn fallback_query(query: &str, country_qualifier: &str) -> String {
    if is_zip_code(query) && !country_qualifier.is_empty() {
        format!("{}, {}", query.trim(), country_qualifier)
    } else {
        query.to_string()
    }
}
