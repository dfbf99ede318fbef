use crate::{
    Config, Coordinates, LookupError, PlaceName, WeatherReport,
    provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use reqwest::Client;
use std::fmt::Debug;

pub mod openweather;

/// City used when a weather lookup names none.
pub const FALLBACK_CITY: &str = "New Delhi";

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Resolve coordinates to the nearest named place.
    async fn reverse_geocode(&self, coords: &Coordinates) -> Result<PlaceName, LookupError>;

    /// Current conditions for `city`, or for [`FALLBACK_CITY`] when absent or blank.
    async fn current_weather(&self, city: Option<&str>) -> Result<WeatherReport, LookupError>;
}

/// The city a weather lookup should query.
pub fn resolve_city(city: Option<&str>) -> &str {
    city.map(str::trim)
        .filter(|c| !c.is_empty())
        .unwrap_or(FALLBACK_CITY)
}

/// Construct the provider from config, sharing `http` for its requests.
pub fn provider_from_config(
    config: &Config,
    http: Client,
) -> Result<Box<dyn WeatherProvider>, LookupError> {
    let provider = config
        .openweather
        .as_ref()
        .filter(|_| config.is_provider_configured())
        .ok_or_else(LookupError::missing_api_key)?;

    Ok(Box::new(OpenWeatherProvider::from_config(provider, http)))
}
