use async_trait::async_trait;
use chrono::{DateTime, Datelike};
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};

use crate::{
    config::ProviderConfig,
    error::LookupError,
    model::{Coordinates, PlaceName, WeatherReport},
    provider::{WeatherProvider, resolve_city},
};

const WEEKDAYS: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// Stand-in for a geocoding result without a state or province.
pub const UNKNOWN_STATE: &str = "Unknown";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    api_base: String,
    icon_base: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn from_config(config: &ProviderConfig, http: Client) -> Self {
        Self {
            api_key: config.api_key.clone(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
            icon_base: config.icon_base.trim_end_matches('/').to_string(),
            http,
        }
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
        failure: &str,
    ) -> Result<T, LookupError> {
        let url = format!("{}{}", self.api_base, path);

        let res = self
            .http
            .get(&url)
            .query(query)
            .query(&[("appid", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| LookupError::Network(e.without_url()))?;

        let status = res.status();
        let body = res.text().await.map_err(|e| LookupError::Network(e.without_url()))?;

        if !status.is_success() {
            tracing::warn!(%status, body = %truncate_body(&body), "OpenWeather {path} request failed");
            return Err(LookupError::Upstream { status, message: failure.to_string() });
        }

        tracing::debug!(body = %body, "OpenWeather {path} payload");

        serde_json::from_str(&body)
            .map_err(|e| LookupError::Parse(format!("OpenWeather {path} JSON: {e}")))
    }
}

#[derive(Debug, Deserialize)]
struct OwGeoResult {
    name: String,
    state: Option<String>,
    country: String,
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    humidity: u8,
    pressure: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
    deg: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct OwSys {
    #[serde(default)]
    country: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    dt: i64,
    #[serde(default)]
    timezone: i64,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
    visibility: Option<f64>,
    #[serde(default)]
    sys: OwSys,
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn reverse_geocode(&self, coords: &Coordinates) -> Result<PlaceName, LookupError> {
        let lat = coords.latitude.to_string();
        let lon = coords.longitude.to_string();

        let results: Vec<OwGeoResult> = self
            .fetch(
                "/geo/1.0/reverse",
                &[("lat", lat.as_str()), ("lon", lon.as_str()), ("limit", "1")],
                "Failed to fetch location data",
            )
            .await?;

        let place = place_from_results(results)?;
        tracing::info!(city = %place.city, state = %place.state, "Reverse geocoded");
        Ok(place)
    }

    async fn current_weather(&self, city: Option<&str>) -> Result<WeatherReport, LookupError> {
        let city = resolve_city(city);

        let parsed: OwCurrentResponse = self
            .fetch(
                "/data/2.5/weather",
                &[("q", city), ("units", "metric")],
                "Failed to fetch weather data",
            )
            .await?;

        report_from_current(parsed, &self.icon_base)
    }
}

fn place_from_results(results: Vec<OwGeoResult>) -> Result<PlaceName, LookupError> {
    let first = results
        .into_iter()
        .next()
        .ok_or_else(|| LookupError::NotFound("No location found".to_string()))?;

    let state = first
        .state
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| UNKNOWN_STATE.to_string());

    Ok(PlaceName { city: first.name, state, country: first.country })
}

fn report_from_current(
    parsed: OwCurrentResponse,
    icon_base: &str,
) -> Result<WeatherReport, LookupError> {
    let condition = parsed.weather.into_iter().next().ok_or_else(|| {
        LookupError::Parse("OpenWeather response contained no weather conditions".to_string())
    })?;

    let day_of_week = day_of_week(parsed.dt, parsed.timezone).ok_or_else(|| {
        LookupError::Parse(format!("OpenWeather timestamp {} is out of range", parsed.dt))
    })?;

    Ok(WeatherReport {
        city: parsed.name,
        country: parsed.sys.country,
        temperature: parsed.main.temp.round() as i64,
        humidity: parsed.main.humidity,
        wind_speed: parsed.wind.speed,
        wind_dir: parsed.wind.deg,
        pressure_mb: parsed.main.pressure,
        visibility_km: parsed.visibility.map(|meters| meters / 1000.0),
        feels_like: parsed.main.feels_like,
        weather: condition.description,
        icon: icon_url(icon_base, &condition.icon),
        day_of_week: day_of_week.to_string(),
    })
}

/// Weekday name of a Unix timestamp, shifted by `utc_offset_secs`.
pub fn day_of_week(ts: i64, utc_offset_secs: i64) -> Option<&'static str> {
    let local = DateTime::from_timestamp(ts.checked_add(utc_offset_secs)?, 0)?;
    WEEKDAYS
        .get(local.weekday().num_days_from_sunday() as usize)
        .copied()
}

pub fn icon_url(icon_base: &str, code: &str) -> String {
    format!("{icon_base}/{code}.png")
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_ICON_BASE;
    use serde_json::json;

    fn current_payload() -> serde_json::Value {
        json!({
            "name": "New Delhi",
            "dt": 1_700_000_000,
            "timezone": 19800,
            "main": { "temp": 21.6, "feels_like": 20.9, "humidity": 52, "pressure": 1015 },
            "weather": [{ "main": "Haze", "description": "haze", "icon": "50n" }],
            "wind": { "speed": 2.06, "deg": 300 },
            "visibility": 10000,
            "sys": { "country": "IN" }
        })
    }

    #[test]
    fn weekday_of_known_timestamps() {
        // 2023-11-14T22:13:20Z
        assert_eq!(day_of_week(1_700_000_000, 0), Some("Tuesday"));
        // Same instant in UTC+05:30 is already Wednesday.
        assert_eq!(day_of_week(1_700_000_000, 19_800), Some("Wednesday"));
        assert_eq!(day_of_week(0, 0), Some("Thursday"));
        assert_eq!(day_of_week(i64::MAX, 1), None);
    }

    #[test]
    fn maps_current_payload() {
        let parsed: OwCurrentResponse = serde_json::from_value(current_payload()).unwrap();
        let report = report_from_current(parsed, DEFAULT_ICON_BASE).unwrap();

        assert_eq!(report.city, "New Delhi");
        assert_eq!(report.country, "IN");
        assert_eq!(report.temperature, 22);
        assert_eq!(report.humidity, 52);
        assert_eq!(report.wind_speed, 2.06);
        assert_eq!(report.wind_dir, Some(300.0));
        assert_eq!(report.pressure_mb, 1015.0);
        assert_eq!(report.visibility_km, Some(10.0));
        assert_eq!(report.feels_like, 20.9);
        assert_eq!(report.weather, "haze");
        assert_eq!(report.icon, "https://openweathermap.org/img/wn/50n.png");
        assert_eq!(report.day_of_week, "Wednesday");
    }

    #[test]
    fn missing_visibility_stays_empty() {
        let mut payload = current_payload();
        payload.as_object_mut().unwrap().remove("visibility");

        let parsed: OwCurrentResponse = serde_json::from_value(payload).unwrap();
        let report = report_from_current(parsed, DEFAULT_ICON_BASE).unwrap();
        assert_eq!(report.visibility_km, None);
    }

    #[test]
    fn missing_wind_direction_stays_empty() {
        let mut payload = current_payload();
        payload["wind"] = json!({ "speed": 1.0 });

        let parsed: OwCurrentResponse = serde_json::from_value(payload).unwrap();
        let report = report_from_current(parsed, DEFAULT_ICON_BASE).unwrap();
        assert_eq!(report.wind_dir, None);
        assert_eq!(report.wind_speed, 1.0);
    }

    #[test]
    fn empty_conditions_is_a_parse_error() {
        let mut payload = current_payload();
        payload["weather"] = json!([]);

        let parsed: OwCurrentResponse = serde_json::from_value(payload).unwrap();
        let err = report_from_current(parsed, DEFAULT_ICON_BASE).unwrap_err();
        assert!(matches!(err, LookupError::Parse(_)));
    }

    #[test]
    fn negative_temperatures_round_to_nearest() {
        let mut payload = current_payload();
        payload["main"]["temp"] = json!(-3.4);

        let parsed: OwCurrentResponse = serde_json::from_value(payload).unwrap();
        assert_eq!(report_from_current(parsed, DEFAULT_ICON_BASE).unwrap().temperature, -3);
    }

    #[test]
    fn place_defaults_missing_state() {
        let results: Vec<OwGeoResult> =
            serde_json::from_value(json!([{ "name": "Monaco", "country": "MC" }])).unwrap();

        let place = place_from_results(results).unwrap();
        assert_eq!(place.state, UNKNOWN_STATE);
        assert_eq!(place.country, "MC");
    }

    #[test]
    fn no_results_is_not_found() {
        let err = place_from_results(Vec::new()).unwrap_err();
        assert!(matches!(err, LookupError::NotFound(_)));
        assert_eq!(err.to_string(), "No location found");
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        let long = "é".repeat(300);
        let out = truncate_body(&long);
        assert!(out.ends_with("..."));
        assert_eq!(out.chars().count(), 203);
        assert_eq!(truncate_body("short"), "short");
    }
}
