//! Reshapes a raw forecast document into display-ready tables.
//!
//! Both entry points are total: a missing section yields an empty result, a
//! missing column yields `None` cells for that column only, and row count is
//! always taken from the section's `time` sequence.

use chrono::{DateTime, NaiveDateTime};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::model::{DailyField, ForecastResponse, HourlyField, Section, TIME_KEY};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyRow {
    pub date: String,
    pub temp_max: Option<f64>,
    pub temp_min: Option<f64>,
    pub precipitation_sum: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct DailyTable {
    rows: Vec<DailyRow>,
    section_present: bool,
    missing: Vec<&'static str>,
}

impl DailyTable {
    pub fn rows(&self) -> &[DailyRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Whether the response carried a `daily` section at all.
    pub fn section_present(&self) -> bool {
        self.section_present
    }

    /// Keys absent from a present section, `time` included.
    pub fn missing_fields(&self) -> &[&'static str] {
        &self.missing
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourlyRow {
    pub timestamp: NaiveDateTime,
    pub temperature: Option<f64>,
    pub precipitation: Option<f64>,
    pub weather_code: Option<i32>,
    pub windspeed: Option<f64>,
}

impl HourlyRow {
    pub fn value(&self, field: HourlyField) -> Option<f64> {
        match field {
            HourlyField::Temperature => self.temperature,
            HourlyField::Precipitation => self.precipitation,
            HourlyField::WeatherCode => self.weather_code.map(f64::from),
            HourlyField::WindSpeed => self.windspeed,
        }
    }
}

/// Hourly samples in the order the API sent them (chronological).
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct HourlyTimeSeries {
    rows: Vec<HourlyRow>,
    section_present: bool,
    missing: Vec<&'static str>,
    dropped: usize,
}

impl HourlyTimeSeries {
    pub fn rows(&self) -> &[HourlyRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn section_present(&self) -> bool {
        self.section_present
    }

    pub fn missing_fields(&self) -> &[&'static str] {
        &self.missing
    }

    /// Rows skipped because their timestamp could not be parsed.
    pub fn dropped_rows(&self) -> usize {
        self.dropped
    }

    /// One variable as `(timestamp, value)` points, null samples skipped.
    pub fn series(&self, field: HourlyField) -> Vec<(NaiveDateTime, f64)> {
        self.rows
            .iter()
            .filter_map(|row| row.value(field).map(|v| (row.timestamp, v)))
            .collect()
    }
}

pub fn to_daily_table(response: &ForecastResponse) -> DailyTable {
    let Some(section) = response.section(Section::Daily) else {
        return DailyTable::default();
    };

    let mut columns = Columns::new(section);
    let dates = columns.time();
    let temp_max = columns.numbers(DailyField::TemperatureMax.as_str());
    let temp_min = columns.numbers(DailyField::TemperatureMin.as_str());
    let precipitation_sum = columns.numbers(DailyField::PrecipitationSum.as_str());

    let rows = dates
        .iter()
        .enumerate()
        .map(|(i, date)| DailyRow {
            date: date.as_str().unwrap_or_default().to_string(),
            temp_max: cell(&temp_max, i),
            temp_min: cell(&temp_min, i),
            precipitation_sum: cell(&precipitation_sum, i),
        })
        .collect();

    DailyTable {
        rows,
        section_present: true,
        missing: columns.missing,
    }
}

pub fn to_hourly_time_series(response: &ForecastResponse) -> HourlyTimeSeries {
    let Some(section) = response.section(Section::Hourly) else {
        return HourlyTimeSeries::default();
    };

    let mut columns = Columns::new(section);
    let times = columns.time();
    let temperature = columns.numbers(HourlyField::Temperature.as_str());
    let precipitation = columns.numbers(HourlyField::Precipitation.as_str());
    let weather_code = columns.numbers(HourlyField::WeatherCode.as_str());
    let windspeed = columns.numbers(HourlyField::WindSpeed.as_str());

    let mut rows = Vec::with_capacity(times.len());
    let mut dropped = 0;

    for (i, raw) in times.iter().enumerate() {
        let Some(timestamp) = raw.as_str().and_then(parse_timestamp) else {
            tracing::warn!(
                index = i,
                value = %raw,
                "dropping hourly row with unparseable timestamp"
            );
            dropped += 1;
            continue;
        };

        rows.push(HourlyRow {
            timestamp,
            temperature: cell(&temperature, i),
            precipitation: cell(&precipitation, i),
            weather_code: cell(&weather_code, i).and_then(wmo_code),
            windspeed: cell(&windspeed, i),
        });
    }

    HourlyTimeSeries {
        rows,
        section_present: true,
        missing: columns.missing,
        dropped,
    }
}

/// Accepts the API's minute-resolution local time, a seconds variant, and
/// RFC 3339 (reduced to its wall-clock time).
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    const FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S"];

    FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.naive_local()))
}

/// Column accessor over one section; records every key it fails to find.
struct Columns<'a> {
    section: &'a Map<String, Value>,
    missing: Vec<&'static str>,
}

impl<'a> Columns<'a> {
    fn new(section: &'a Map<String, Value>) -> Self {
        Self {
            section,
            missing: Vec::new(),
        }
    }

    fn array(&mut self, key: &'static str) -> &'a [Value] {
        match self.section.get(key).and_then(Value::as_array) {
            Some(values) => values,
            None => {
                self.missing.push(key);
                Default::default()
            }
        }
    }

    fn time(&mut self) -> &'a [Value] {
        self.array(TIME_KEY)
    }

    fn numbers(&mut self, key: &'static str) -> Vec<Option<f64>> {
        self.array(key).iter().map(Value::as_f64).collect()
    }
}

fn cell(column: &[Option<f64>], index: usize) -> Option<f64> {
    column.get(index).copied().flatten()
}

fn wmo_code(value: f64) -> Option<i32> {
    (value.fract() == 0.0 && (0.0..=i32::MAX as f64).contains(&value)).then_some(value as i32)
}
