use serde::{Deserialize, Serialize};

use crate::error::LookupError;

/// A device or user supplied position, in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Build coordinates from raw query values; both must be present and numeric.
    pub fn parse(latitude: Option<&str>, longitude: Option<&str>) -> Result<Self, LookupError> {
        let (lat, long) = match (non_blank(latitude), non_blank(longitude)) {
            (Some(lat), Some(long)) => (lat, long),
            _ => {
                return Err(LookupError::Validation(
                    "Latitude and longitude are required".to_string(),
                ));
            }
        };

        let latitude = parse_degrees("latitude", lat)?;
        let longitude = parse_degrees("longitude", long)?;

        Ok(Self { latitude, longitude })
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn parse_degrees(name: &str, raw: &str) -> Result<f64, LookupError> {
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| LookupError::Validation(format!("Invalid {name}: '{raw}'")))
}

/// Result of reverse geocoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceName {
    pub city: String,
    pub state: String,
    pub country: String,
}

/// Current conditions for one city, reshaped for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub city: String,
    pub country: String,
    /// Degrees Celsius, rounded.
    pub temperature: i64,
    /// Percent.
    pub humidity: u8,
    pub wind_speed: f64,
    /// Degrees; `None` when the provider did not report a direction.
    pub wind_dir: Option<f64>,
    pub pressure_mb: f64,
    /// `None` when the provider did not report visibility.
    pub visibility_km: Option<f64>,
    pub feels_like: f64,
    pub weather: String,
    pub icon: String,
    pub day_of_week: String,
}

/// JSON error payload returned by both endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self { error: error.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_decimal_strings() {
        let coords = Coordinates::parse(Some("28.6139"), Some(" 77.209 ")).unwrap();
        assert_eq!(coords, Coordinates::new(28.6139, 77.209));
    }

    #[test]
    fn parse_requires_both_values() {
        let err = Coordinates::parse(Some("28.6"), None).unwrap_err();
        assert_eq!(err.to_string(), "Latitude and longitude are required");

        let err = Coordinates::parse(Some(""), Some("77.2")).unwrap_err();
        assert!(matches!(err, LookupError::Validation(_)));
    }

    #[test]
    fn parse_rejects_non_numeric() {
        let err = Coordinates::parse(Some("north"), Some("77.2")).unwrap_err();
        assert!(matches!(err, LookupError::Validation(ref m) if m.contains("latitude")));

        let err = Coordinates::parse(Some("28.6"), Some("NaN")).unwrap_err();
        assert!(matches!(err, LookupError::Validation(ref m) if m.contains("longitude")));
    }

    #[test]
    fn report_serializes_with_display_keys() {
        let report = WeatherReport {
            city: "Pune".into(),
            country: "IN".into(),
            temperature: 31,
            humidity: 40,
            wind_speed: 3.1,
            wind_dir: None,
            pressure_mb: 1008.0,
            visibility_km: None,
            feels_like: 33.2,
            weather: "haze".into(),
            icon: "https://openweathermap.org/img/wn/50d.png".into(),
            day_of_week: "Monday".into(),
        };

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["temperature"], 31);
        assert_eq!(json["day_of_week"], "Monday");
        assert!(json["visibility_km"].is_null());
        assert!(json["wind_dir"].is_null());
    }
}
