use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use tracing::{info, warn};
use weather_core::{
    Coordinates, LookupError, PlaceName, WeatherReport, provider::resolve_city,
    provider_from_config,
};

use crate::AppState;
use crate::response::lookup_error_response;

/// Raw query pairs; repeated keys are kept so the first value can win.
type QueryPairs = Result<Query<Vec<(String, String)>>, QueryRejection>;

pub(crate) async fn location_handler(
    State(state): State<AppState>,
    query: QueryPairs,
) -> Response {
    match lookup_location(&state, query).await {
        Ok(place) => Json(place).into_response(),
        Err(e) => {
            warn!(error = %e, "GET /api/location failed");
            lookup_error_response(&e)
        }
    }
}

pub(crate) async fn weather_handler(State(state): State<AppState>, query: QueryPairs) -> Response {
    match lookup_weather(&state, query).await {
        Ok(report) => Json(report).into_response(),
        Err(e) => {
            warn!(error = %e, "GET /api/weather failed");
            lookup_error_response(&e)
        }
    }
}

async fn lookup_location(state: &AppState, query: QueryPairs) -> Result<PlaceName, LookupError> {
    let Query(pairs) = query.map_err(|e| LookupError::Validation(e.body_text()))?;
    let coords = Coordinates::parse(first_param(&pairs, "lat"), first_param(&pairs, "long"))?;

    let provider = provider_from_config(&state.config, state.http.clone())?;

    info!(lat = coords.latitude, long = coords.longitude, "GET /api/location");
    provider.reverse_geocode(&coords).await
}

async fn lookup_weather(state: &AppState, query: QueryPairs) -> Result<WeatherReport, LookupError> {
    // This endpoint only answers 500 on failure, whatever the cause.
    let Query(pairs) = query.map_err(|e| LookupError::Parse(e.body_text()))?;

    let provider = provider_from_config(&state.config, state.http.clone())?;

    let city = first_param(&pairs, "city");
    info!(city = resolve_city(city), "GET /api/weather");
    provider.current_weather(city).await
}

fn first_param<'a>(pairs: &'a [(String, String)], name: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.as_str())
}
