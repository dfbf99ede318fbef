use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;

use crate::{
    error::LookupError,
    model::{Coordinates, ErrorBody, PlaceName, WeatherReport},
};

/// The two lookup endpoints as seen from the client side.
#[async_trait]
pub trait WeatherApi: Send + Sync {
    async fn location(&self, coords: &Coordinates) -> Result<PlaceName, LookupError>;

    async fn weather(&self, city: &str) -> Result<WeatherReport, LookupError>;
}

/// HTTP client for a running `weather-server`.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    http: Client,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self { base_url: base_url.trim_end_matches('/').to_string(), http: Client::new() }
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, LookupError> {
        let res = self
            .http
            .get(format!("{}{}", self.base_url, path))
            .query(query)
            .send()
            .await?;

        decode(res).await
    }
}

async fn decode<T: DeserializeOwned>(res: Response) -> Result<T, LookupError> {
    let status = res.status();
    let body = res.text().await?;

    if status.is_success() {
        return serde_json::from_str(&body)
            .map_err(|e| LookupError::Parse(format!("Unexpected response body: {e}")));
    }

    let message = serde_json::from_str::<ErrorBody>(&body)
        .map(|b| b.error)
        .unwrap_or_else(|_| format!("Request failed with status {status}"));

    Err(LookupError::from_status(status, message))
}

#[async_trait]
impl WeatherApi for ApiClient {
    async fn location(&self, coords: &Coordinates) -> Result<PlaceName, LookupError> {
        let lat = coords.latitude.to_string();
        let long = coords.longitude.to_string();
        self.get("/api/location", &[("lat", lat.as_str()), ("long", long.as_str())])
            .await
    }

    async fn weather(&self, city: &str) -> Result<WeatherReport, LookupError> {
        self.get("/api/weather", &[("city", city)]).await
    }
}
