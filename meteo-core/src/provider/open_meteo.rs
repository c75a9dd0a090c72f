use async_trait::async_trait;
use reqwest::{Client, Url};
use serde_json::Value;
use std::time::Duration;

use crate::{
    model::{Coordinate, ForecastResponse},
    query::ForecastQuery,
};

use super::{FetchError, ForecastSource};

pub const DEFAULT_BASE_URL: &str = "https://api.open-meteo.com/v1/forecast";

/// Upper bound on a single request, connect through body.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Open-Meteo forecast endpoint. One GET per fetch, never retried.
#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    base_url: String,
    timeout: Duration,
    http: Client,
}

impl OpenMeteoClient {
    pub fn new() -> Result<Self, FetchError> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, FetchError> {
        Self::with_timeout(base_url, REQUEST_TIMEOUT)
    }

    /// Build a client with a non-default timeout. Production code paths use
    /// [`REQUEST_TIMEOUT`].
    pub fn with_timeout(
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, FetchError> {
        let base_url = base_url.into();
        Url::parse(&base_url).map_err(|e| FetchError::InvalidBaseUrl {
            url: base_url.clone(),
            reason: e.to_string(),
        })?;

        let http = Client::builder().timeout(timeout).build().map_err(FetchError::Network)?;

        Ok(Self {
            base_url,
            timeout,
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn get(&self, query: &ForecastQuery) -> Result<ForecastResponse, FetchError> {
        tracing::debug!(
            base_url = %self.base_url,
            query = %query.query_string(),
            "requesting forecast"
        );

        let res = self
            .http
            .get(&self.base_url)
            .query(&query.params())
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = res.status();
        let body = res.text().await.map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            tracing::warn!(%status, "forecast request rejected");
            return Err(FetchError::Status {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        let document: Value =
            serde_json::from_str(&body).map_err(|e| FetchError::Decode(e.to_string()))?;

        Ok(ForecastResponse::new(document))
    }

    fn transport_error(&self, err: reqwest::Error) -> FetchError {
        if err.is_timeout() {
            FetchError::Timeout(self.timeout)
        } else {
            FetchError::Network(err)
        }
    }
}

#[async_trait]
impl ForecastSource for OpenMeteoClient {
    async fn fetch(&self, coordinate: Coordinate) -> Result<ForecastResponse, FetchError> {
        self.get(&ForecastQuery::new(coordinate)).await
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn tokyo() -> Coordinate {
        Coordinate::new(35.6762, 139.6503).unwrap()
    }

    fn endpoint(server: &MockServer) -> String {
        format!("{}/v1/forecast", server.uri())
    }

    #[test]
    fn default_timeout_is_ten_seconds() {
        let client = OpenMeteoClient::new().unwrap();
        assert_eq!(client.timeout(), Duration::from_secs(10));
        assert_eq!(client.base_url(), DEFAULT_BASE_URL);
    }

    #[test]
    fn truncate_body_keeps_char_boundaries() {
        let long = "é".repeat(300);
        let cut = truncate_body(&long);
        assert_eq!(cut.chars().count(), 203);
        assert!(cut.ends_with("..."));
        assert_eq!(truncate_body("short"), "short");
    }

    #[tokio::test]
    async fn fetch_returns_document_untouched() {
        let server = MockServer::start().await;
        let payload = json!({
            "latitude": 35.7,
            "longitude": 139.625,
            "daily": { "time": ["2024-01-01"], "temperature_2m_max": [9.1] },
        });

        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .and(query_param("latitude", "35.6762"))
            .and(query_param("longitude", "139.6503"))
            .and(query_param("timezone", "auto"))
            .respond_with(ResponseTemplate::new(200).set_body_json(payload.clone()))
            .expect(1)
            .mount(&server)
            .await;

        let client = OpenMeteoClient::with_base_url(endpoint(&server)).unwrap();
        let response = client.fetch(tokyo()).await.unwrap();

        assert_eq!(response.as_json(), &payload);
    }

    #[tokio::test]
    async fn fetch_maps_server_error_to_status() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
            .expect(1)
            .mount(&server)
            .await;

        let client = OpenMeteoClient::with_base_url(endpoint(&server)).unwrap();
        let err = client.fetch(tokyo()).await.unwrap_err();

        match err {
            FetchError::Status { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "upstream exploded");
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn fetch_times_out_instead_of_hanging() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({}))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let client =
            OpenMeteoClient::with_timeout(endpoint(&server), Duration::from_millis(200)).unwrap();
        let err = client.fetch(tokyo()).await.unwrap_err();

        assert!(matches!(err, FetchError::Timeout(d) if d == Duration::from_millis(200)));
    }

    #[tokio::test]
    #[ignore] // Waits out the full production timeout: cargo test -- --ignored
    async fn fetch_times_out_after_ten_seconds() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(11)))
            .mount(&server)
            .await;

        let client = OpenMeteoClient::with_base_url(endpoint(&server)).unwrap();
        let err = client.fetch(tokyo()).await.unwrap_err();

        assert!(matches!(err, FetchError::Timeout(d) if d == REQUEST_TIMEOUT));
    }

    #[tokio::test]
    async fn fetch_rejects_malformed_body() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let client = OpenMeteoClient::with_base_url(endpoint(&server)).unwrap();
        let err = client.fetch(tokyo()).await.unwrap_err();

        assert!(matches!(err, FetchError::Decode(_)));
    }

    #[tokio::test]
    async fn fetch_passes_non_object_document_through() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([1, 2, 3])))
            .mount(&server)
            .await;

        let client = OpenMeteoClient::with_base_url(endpoint(&server)).unwrap();
        let response = client.fetch(tokyo()).await.unwrap();

        assert_eq!(response.as_json(), &json!([1, 2, 3]));
        assert!(crate::shaper::to_daily_table(&response).is_empty());
        assert!(crate::shaper::to_hourly_time_series(&response).is_empty());
    }

    #[tokio::test]
    async fn fetch_appends_to_existing_base_query() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .and(query_param("apikey", "x"))
            .and(query_param("latitude", "35.6762"))
            .and(query_param("longitude", "139.6503"))
            .and(query_param("daily", "temperature_2m_max,temperature_2m_min,precipitation_sum"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let client =
            OpenMeteoClient::with_base_url(format!("{}?apikey=x", endpoint(&server))).unwrap();

        assert!(client.fetch(tokyo()).await.is_ok());
    }
}
