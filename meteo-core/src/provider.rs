use crate::{
    Config,
    model::{Coordinate, ForecastResponse},
    provider::open_meteo::OpenMeteoClient,
};
use async_trait::async_trait;
use std::{fmt::Debug, time::Duration};

pub mod open_meteo;

/// Failure of a single forecast request cycle.
///
/// Every variant carries a message fit to show the user as-is.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Forecast request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Failed to reach the forecast service: {0}")]
    Network(#[source] reqwest::Error),

    #[error("Forecast service responded with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Forecast response could not be parsed: {0}")]
    Decode(String),

    #[error("Invalid forecast service URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

/// Anything that can turn a coordinate into a forecast document.
#[async_trait]
pub trait ForecastSource: Send + Sync + Debug {
    async fn fetch(&self, coordinate: Coordinate) -> Result<ForecastResponse, FetchError>;
}

/// Construct the forecast source described by the config.
pub fn source_from_config(config: &Config) -> Result<Box<dyn ForecastSource>, FetchError> {
    let client = OpenMeteoClient::with_base_url(config.api_base_url())?;
    Ok(Box::new(client))
}
