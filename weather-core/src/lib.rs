//! Core library for the weather lookup service.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The OpenWeather provider (reverse geocoding and current weather)
//! - Shared domain models and the lookup error taxonomy
//! - The client-side controller that drives a lookup session
//!
//! It is used by `weather-server` and `weather-cli`.

pub mod background;
pub mod client;
pub mod config;
pub mod controller;
pub mod error;
pub mod model;
pub mod provider;

pub use background::{Backdrop, Background};
pub use client::{ApiClient, WeatherApi};
pub use config::{Config, ProviderConfig, ServerConfig};
pub use controller::{
    Controller, FixedPosition, NoPosition, PositionError, PositionSource, SessionState,
    WeatherDisplay,
};
pub use error::LookupError;
pub use model::{Coordinates, ErrorBody, PlaceName, WeatherReport};
pub use provider::{FALLBACK_CITY, WeatherProvider, provider_from_config};
