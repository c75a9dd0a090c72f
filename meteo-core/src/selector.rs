use serde::Deserialize;

use crate::model::Coordinate;

/// A click on the map surface, in the shape map widgets report it.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ClickEvent {
    pub lat: f64,
    pub lng: f64,
}

impl From<Coordinate> for ClickEvent {
    fn from(c: Coordinate) -> Self {
        Self {
            lat: c.latitude(),
            lng: c.longitude(),
        }
    }
}

/// Initial center and zoom handed to the map surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapView {
    pub center: Coordinate,
    pub zoom: u8,
}

/// Holds the most recent map pick for the current session.
#[derive(Debug, Clone, Default)]
pub struct CoordinateSelector {
    last_selection: Option<Coordinate>,
}

impl CoordinateSelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a click and return the selection that is now current.
    ///
    /// Web maps keep counting longitude past the antimeridian, so longitude
    /// is wrapped and latitude clamped. A non-finite click is ignored.
    pub fn select(&mut self, click: ClickEvent) -> Option<Coordinate> {
        match normalize(click) {
            Some(coordinate) => self.last_selection = Some(coordinate),
            None => tracing::debug!(?click, "ignoring click with non-finite position"),
        }
        self.last_selection
    }

    pub fn selection(&self) -> Option<Coordinate> {
        self.last_selection
    }
}

fn normalize(click: ClickEvent) -> Option<Coordinate> {
    if !click.lat.is_finite() || !click.lng.is_finite() {
        return None;
    }

    let latitude = click.lat.clamp(-90.0, 90.0);
    let longitude = if (-180.0..=180.0).contains(&click.lng) {
        click.lng
    } else {
        (click.lng + 180.0).rem_euclid(360.0) - 180.0
    };

    Coordinate::new(latitude, longitude).ok()
}
