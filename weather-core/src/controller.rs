//! Client-side session: find a place, look up its weather, hold what is shown.

use async_trait::async_trait;
use chrono::{Local, Timelike};
use tokio::sync::watch;

use crate::{
    background::Backdrop,
    client::WeatherApi,
    error::LookupError,
    model::{Coordinates, PlaceName, WeatherReport},
    provider::openweather::UNKNOWN_STATE,
};

pub const BLANK_CITY_MESSAGE: &str = "Please enter a city name.";
pub const WEATHER_FAILED_MESSAGE: &str = "Failed to fetch weather data.";
pub const LOCATION_FAILED_MESSAGE: &str = "Failed to fetch location data.";

/// Why the device position could not be obtained.
#[derive(Debug, thiserror::Error)]
pub enum PositionError {
    #[error("Location permission denied")]
    PermissionDenied,
    #[error("Location service unavailable")]
    Unavailable,
}

/// Source of the device's current position.
#[async_trait]
pub trait PositionSource: Send + Sync {
    async fn current_position(&self) -> Result<Coordinates, PositionError>;
}

/// A position known up front, e.g. passed on the command line.
#[derive(Debug, Clone, Copy)]
pub struct FixedPosition(pub Coordinates);

#[async_trait]
impl PositionSource for FixedPosition {
    async fn current_position(&self) -> Result<Coordinates, PositionError> {
        Ok(self.0)
    }
}

/// A device without positioning support.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPosition;

#[async_trait]
impl PositionSource for NoPosition {
    async fn current_position(&self) -> Result<Coordinates, PositionError> {
        Err(PositionError::Unavailable)
    }
}

/// What the user currently sees.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherDisplay {
    pub report: WeatherReport,
    pub backdrop: Backdrop,
    /// Set when the lookup started from the device position.
    pub place: Option<PlaceName>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Idle,
    LocatingUser,
    LookupPlace(Coordinates),
    /// `request` numbers weather requests from 1 within a session.
    LookupWeather { city: String, request: u64 },
    Displaying(WeatherDisplay),
    Error(String),
}

type HourSource = Box<dyn Fn() -> u32 + Send + Sync>;

pub struct Controller<A> {
    api: A,
    state: SessionState,
    updates: watch::Sender<SessionState>,
    request_seq: u64,
    local_hour: HourSource,
}

impl<A: WeatherApi> Controller<A> {
    pub fn new(api: A) -> Self {
        let (updates, _) = watch::channel(SessionState::Idle);
        Self {
            api,
            state: SessionState::Idle,
            updates,
            request_seq: 0,
            local_hour: Box::new(|| Local::now().hour()),
        }
    }

    /// Replace the clock used to decide whether the night filter applies.
    pub fn with_local_hour(mut self, hour: impl Fn() -> u32 + Send + Sync + 'static) -> Self {
        self.local_hour = Box::new(hour);
        self
    }

    /// Every state the session enters, as it is entered.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.updates.subscribe()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn display(&self) -> Option<&WeatherDisplay> {
        match &self.state {
            SessionState::Displaying(display) => Some(display),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            SessionState::Error(message) => Some(message),
            _ => None,
        }
    }

    fn transition(&mut self, next: SessionState) -> &SessionState {
        self.updates.send_replace(next.clone());
        self.state = next;
        &self.state
    }

    /// Start a session from the device position.
    pub async fn on_load(&mut self, positions: &dyn PositionSource) -> &SessionState {
        self.transition(SessionState::LocatingUser);

        let coords = match positions.current_position().await {
            Ok(coords) => coords,
            Err(e) => {
                tracing::warn!(error = %e, "Could not obtain device position");
                let message = format!("Unable to retrieve your location: {e}");
                return self.transition(SessionState::Error(message));
            }
        };

        self.transition(SessionState::LookupPlace(coords));

        let place = match self.api.location(&coords).await {
            Ok(place) => place,
            Err(e) => {
                tracing::warn!(error = %e, "Location lookup failed");
                let message = user_message(&e, LOCATION_FAILED_MESSAGE);
                return self.transition(SessionState::Error(message));
            }
        };

        let city = search_term(&place).to_string();
        self.fetch_weather(city, Some(place)).await
    }

    /// Handle a manual search for `input`.
    pub async fn submit(&mut self, input: &str) -> &SessionState {
        let city = input.trim();
        if city.is_empty() {
            return self.transition(SessionState::Error(BLANK_CITY_MESSAGE.to_string()));
        }

        self.fetch_weather(city.to_string(), None).await
    }

    async fn fetch_weather(&mut self, city: String, place: Option<PlaceName>) -> &SessionState {
        self.request_seq += 1;
        let request = self.request_seq;
        // Whatever was shown is dropped before the response arrives.
        self.transition(SessionState::LookupWeather { city: city.clone(), request });

        tracing::info!(%city, request, "Fetching weather");
        let next = match self.api.weather(&city).await {
            Ok(report) => {
                let backdrop = Backdrop::select(&report.weather, (self.local_hour)());
                SessionState::Displaying(WeatherDisplay { report, backdrop, place })
            }
            Err(e) => {
                tracing::warn!(error = %e, %city, "Weather lookup failed");
                SessionState::Error(user_message(&e, WEATHER_FAILED_MESSAGE))
            }
        };
        self.transition(next)
    }
}

/// The weather search term for a reverse-geocoded place.
pub fn search_term(place: &PlaceName) -> &str {
    if place.state == UNKNOWN_STATE { &place.city } else { &place.state }
}

fn user_message(err: &LookupError, fallback: &str) -> String {
    match err {
        LookupError::Network(_) | LookupError::Parse(_) => fallback.to_string(),
        other => other.to_string(),
    }
}
