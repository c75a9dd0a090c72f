use crate::{
    model::{Coordinate, ForecastResponse},
    provider::{FetchError, ForecastSource},
    selector::{ClickEvent, CoordinateSelector},
    shaper::{DailyTable, HourlyTimeSeries, to_daily_table, to_hourly_time_series},
};

/// Everything the presentation layer needs for one successful cycle.
#[derive(Debug, Clone)]
pub struct ForecastView {
    pub coordinate: Coordinate,
    pub daily: DailyTable,
    pub hourly: HourlyTimeSeries,
    pub raw: ForecastResponse,
}

/// Result of one request cycle.
#[derive(Debug)]
pub enum CycleOutcome {
    /// Nothing has been picked yet.
    SelectionPending,
    /// The fetch failed; nothing from this cycle should be rendered.
    Failed {
        coordinate: Coordinate,
        error: FetchError,
    },
    Ready(Box<ForecastView>),
}

/// One user's interaction state: the last map pick plus the source used to
/// fetch forecasts for it.
#[derive(Debug)]
pub struct Session {
    selector: CoordinateSelector,
    source: Box<dyn ForecastSource>,
}

impl Session {
    pub fn new(source: Box<dyn ForecastSource>) -> Self {
        Self {
            selector: CoordinateSelector::new(),
            source,
        }
    }

    pub fn click(&mut self, click: ClickEvent) -> Option<Coordinate> {
        self.selector.select(click)
    }

    pub fn selection(&self) -> Option<Coordinate> {
        self.selector.selection()
    }

    /// Fetch and shape the forecast for the current selection.
    ///
    /// Exactly one fetch is issued per call. Callers render the returned
    /// outcome in place of any earlier one.
    pub async fn run_cycle(&self) -> CycleOutcome {
        let Some(coordinate) = self.selector.selection() else {
            return CycleOutcome::SelectionPending;
        };

        let raw = match self.source.fetch(coordinate).await {
            Ok(raw) => raw,
            Err(error) => {
                tracing::warn!(%coordinate, %error, "forecast fetch failed");
                return CycleOutcome::Failed { coordinate, error };
            }
        };

        let daily = to_daily_table(&raw);
        let hourly = to_hourly_time_series(&raw);
        tracing::info!(
            %coordinate,
            daily_rows = daily.len(),
            hourly_rows = hourly.len(),
            "forecast ready"
        );

        CycleOutcome::Ready(Box::new(ForecastView {
            coordinate,
            daily,
            hourly,
            raw,
        }))
    }
}
