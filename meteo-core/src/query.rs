use crate::model::{Coordinate, DailyField, HourlyField};

/// Timezone mode sent with every query; the API resolves it from the point.
pub const TIMEZONE_MODE: &str = "auto";

/// Outbound query for one coordinate.
///
/// The requested variables are fixed; the query is a pure function of the
/// coordinate it was built from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForecastQuery {
    coordinate: Coordinate,
}

impl ForecastQuery {
    pub fn new(coordinate: Coordinate) -> Self {
        Self { coordinate }
    }

    pub fn coordinate(&self) -> Coordinate {
        self.coordinate
    }

    /// Query parameters in the order the API documents them.
    ///
    /// Coordinates use `f64`'s shortest round-trip formatting, so nothing is
    /// truncated on the way out.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("latitude", self.coordinate.latitude().to_string()),
            ("longitude", self.coordinate.longitude().to_string()),
            ("hourly", join(HourlyField::all().iter().map(HourlyField::as_str))),
            ("daily", join(DailyField::all().iter().map(DailyField::as_str))),
            ("timezone", TIMEZONE_MODE.to_string()),
        ]
    }

    pub fn query_string(&self) -> String {
        self.params()
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<_>>()
            .join("&")
    }
}

impl From<Coordinate> for ForecastQuery {
    fn from(coordinate: Coordinate) -> Self {
        Self::new(coordinate)
    }
}

fn join<'a>(keys: impl Iterator<Item = &'a str>) -> String {
    keys.collect::<Vec<_>>().join(",")
}
