//! Core library for the `meteo` point forecast dashboard.
//!
//! This crate defines:
//! - Map selection of a single coordinate
//! - The Open-Meteo forecast client and its typed failure
//! - Shaping of the raw forecast into a daily table and an hourly series
//! - Configuration handling
//!
//! It is used by `meteo-cli`, but has no terminal or rendering concerns of its own.

pub mod condition;
pub mod config;
pub mod model;
pub mod provider;
pub mod query;
pub mod selector;
pub mod session;
pub mod shaper;

pub use condition::WeatherCondition;
pub use config::{Config, MapConfig};
pub use model::{Coordinate, CoordinateError, DailyField, ForecastResponse, HourlyField, Section};
pub use provider::{FetchError, ForecastSource, open_meteo::OpenMeteoClient, source_from_config};
pub use query::ForecastQuery;
pub use selector::{ClickEvent, CoordinateSelector, MapView};
pub use session::{CycleOutcome, ForecastView, Session};
pub use shaper::{
    DailyRow, DailyTable, HourlyRow, HourlyTimeSeries, to_daily_table, to_hourly_time_series,
};
