/// Upstream service endpoints
pub const CENSUS_API: &str = "https://geocoding.geo.census.gov/geocoder";
pub const NOMINATIM_API: &str = "https://nominatim.openstreetmap.org";
pub const NWS_API: &str = "https://api.weather.gov";

// Census (precise, U.S. addresses only)
pub const CENSUS_ONELINE: &str = "/locations/onelineaddress";
pub const CENSUS_COMPONENTS: &str = "/locations/address";

// Nominatim (places, ZIP codes, worldwide)
pub const NOMINATIM_SEARCH: &str = "/search";

// National Weather Service
pub const NWS_POINTS: &str = "/points";

/// `base` with any trailing slashes dropped, then `path` appended as-is.
/// Every path constant above starts with `/`.
pub fn join(base: &str, path: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), path)
}
