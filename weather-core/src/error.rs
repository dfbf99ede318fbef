use reqwest::StatusCode;

/// Failure of a location or weather lookup.
///
/// The server turns each variant into an HTTP status plus an `{error}` body;
/// the client turns a non-success endpoint answer back into one of these.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    /// Missing or malformed caller input.
    #[error("{0}")]
    Validation(String),

    /// The provider credential is not configured.
    #[error("{0}")]
    Config(String),

    /// The provider (or the lookup endpoint) answered with a non-success status.
    #[error("{message}")]
    Upstream { status: StatusCode, message: String },

    /// The lookup succeeded but matched nothing.
    #[error("{0}")]
    NotFound(String),

    /// The request never produced a response.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The response body did not have the expected shape.
    #[error("Parse error: {0}")]
    Parse(String),
}

impl LookupError {
    pub fn missing_api_key() -> Self {
        LookupError::Config("API key is missing".to_string())
    }

    /// Rebuild an error from an endpoint's status code and `{error}` message.
    pub fn from_status(status: StatusCode, message: String) -> Self {
        match status {
            StatusCode::BAD_REQUEST => LookupError::Validation(message),
            StatusCode::NOT_FOUND => LookupError::NotFound(message),
            _ => LookupError::Upstream { status, message },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_status_maps_client_errors() {
        let err = LookupError::from_status(StatusCode::BAD_REQUEST, "bad".into());
        assert!(matches!(err, LookupError::Validation(m) if m == "bad"));

        let err = LookupError::from_status(StatusCode::NOT_FOUND, "none".into());
        assert!(matches!(err, LookupError::NotFound(_)));

        let err = LookupError::from_status(StatusCode::INTERNAL_SERVER_ERROR, "boom".into());
        assert_eq!(err.to_string(), "boom");
    }
}
