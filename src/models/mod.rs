pub mod forecast;
pub mod location;

pub use forecast::ForecastPeriod;
pub use location::Location;
