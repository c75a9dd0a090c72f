use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// A validated point on the Earth's surface.
///
/// Fields are private so a `Coordinate` can only be built through
/// [`Coordinate::new`] or the map selector, both of which keep it in range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CoordinateError {
    #[error("Coordinates must be finite numbers")]
    NotFinite,
    #[error("Latitude {0} is outside the range -90..=90")]
    LatitudeOutOfRange(f64),
    #[error("Longitude {0} is outside the range -180..=180")]
    LongitudeOutOfRange(f64),
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoordinateError> {
        if !latitude.is_finite() || !longitude.is_finite() {
            return Err(CoordinateError::NotFinite);
        }
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(CoordinateError::LatitudeOutOfRange(latitude));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(CoordinateError::LongitudeOutOfRange(longitude));
        }

        Ok(Self {
            latitude,
            longitude,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

/// Rounded for display only; requests always carry full precision.
impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "latitude {:.4}, longitude {:.4}", self.latitude, self.longitude)
    }
}

/// Top-level sections of an Open-Meteo forecast document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Daily,
    Hourly,
}

impl Section {
    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Daily => "daily",
            Section::Hourly => "hourly",
        }
    }

    fn units_key(&self) -> &'static str {
        match self {
            Section::Daily => "daily_units",
            Section::Hourly => "hourly_units",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Key of the index sequence every other column in a section is aligned to.
pub const TIME_KEY: &str = "time";

/// Daily aggregate variables requested from the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DailyField {
    TemperatureMax,
    TemperatureMin,
    PrecipitationSum,
}

impl DailyField {
    pub fn as_str(&self) -> &'static str {
        match self {
            DailyField::TemperatureMax => "temperature_2m_max",
            DailyField::TemperatureMin => "temperature_2m_min",
            DailyField::PrecipitationSum => "precipitation_sum",
        }
    }

    pub const fn all() -> &'static [DailyField] {
        &[
            DailyField::TemperatureMax,
            DailyField::TemperatureMin,
            DailyField::PrecipitationSum,
        ]
    }
}

/// Hourly sample variables requested from the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HourlyField {
    Temperature,
    Precipitation,
    WeatherCode,
    WindSpeed,
}

impl HourlyField {
    pub fn as_str(&self) -> &'static str {
        match self {
            HourlyField::Temperature => "temperature_2m",
            HourlyField::Precipitation => "precipitation",
            HourlyField::WeatherCode => "weathercode",
            HourlyField::WindSpeed => "windspeed_10m",
        }
    }

    pub const fn all() -> &'static [HourlyField] {
        &[
            HourlyField::Temperature,
            HourlyField::Precipitation,
            HourlyField::WeatherCode,
            HourlyField::WindSpeed,
        ]
    }

    /// The variables drawn as independent charts.
    pub const fn charted() -> &'static [HourlyField] {
        &[
            HourlyField::Temperature,
            HourlyField::Precipitation,
            HourlyField::WindSpeed,
        ]
    }
}

/// The forecast document exactly as the API returned it.
///
/// No field presence is checked here; see [`crate::shaper`] for the
/// tolerant accessors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ForecastResponse {
    document: Value,
}

impl ForecastResponse {
    pub fn new(document: Value) -> Self {
        Self { document }
    }

    pub fn as_json(&self) -> &Value {
        &self.document
    }

    /// The section object, or `None` if it is absent or not an object.
    pub fn section(&self, section: Section) -> Option<&Map<String, Value>> {
        self.document.get(section.as_str())?.as_object()
    }

    /// Unit label the API reported for a variable, e.g. `"°C"`.
    pub fn unit(&self, section: Section, key: &str) -> Option<&str> {
        self.document.get(section.units_key())?.get(key)?.as_str()
    }

    pub fn to_pretty_json(&self) -> String {
        serde_json::to_string_pretty(&self.document).unwrap_or_else(|_| self.document.to_string())
    }
}
