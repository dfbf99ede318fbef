use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use weather_core::{ErrorBody, LookupError};

#[must_use]
pub(crate) fn lookup_error_status(err: &LookupError) -> StatusCode {
    match err {
        LookupError::Validation(_) => StatusCode::BAD_REQUEST,
        LookupError::NotFound(_) => StatusCode::NOT_FOUND,
        LookupError::Config(_)
        | LookupError::Upstream { .. }
        | LookupError::Network(_)
        | LookupError::Parse(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[must_use]
pub(crate) fn lookup_error_response(err: &LookupError) -> Response {
    let status = lookup_error_status(err);
    (status, Json(ErrorBody::new(err.to_string()))).into_response()
}
