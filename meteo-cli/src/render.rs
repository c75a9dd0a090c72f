//! Text rendering of forecast results.
//!
//! Every function returns a `String` so output can be asserted on in tests.

use chrono::NaiveDateTime;
use meteo_core::{
    CycleOutcome, DailyTable, ForecastResponse, ForecastView, HourlyField, HourlyTimeSeries,
    Section, WeatherCondition,
};
use std::fmt::Write;

const BAR_WIDTH: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub hours: usize,
    pub raw: bool,
}

pub fn outcome(outcome: &CycleOutcome, options: RenderOptions) -> String {
    match outcome {
        CycleOutcome::SelectionPending => {
            "Click a point on the map to fetch weather data for that location.\n".to_string()
        }
        CycleOutcome::Failed { coordinate, error } => {
            format!("Failed to fetch weather data for {coordinate}: {error}\n")
        }
        CycleOutcome::Ready(view) => forecast(view, options),
    }
}

pub fn forecast(view: &ForecastView, options: RenderOptions) -> String {
    let mut out = format!("Selected location: {}\n\n", view.coordinate);
    out.push_str(&daily(&view.daily, &view.raw));
    out.push('\n');
    out.push_str(&hourly(&view.hourly, &view.raw, options.hours));

    if options.raw {
        out.push_str("\nFull API response (JSON)\n");
        out.push_str(&view.raw.to_pretty_json());
        out.push('\n');
    }

    out
}

pub fn daily(table: &DailyTable, raw: &ForecastResponse) -> String {
    let mut out = String::from("Daily summary\n");
    if table.is_empty() {
        out.push_str("No daily data available.\n");
        return out;
    }

    let unit = |key: &str, fallback: &'static str| {
        raw.unit(Section::Daily, key).unwrap_or(fallback).to_string()
    };
    let header = [
        "date".to_string(),
        format!("temp_max ({})", unit("temperature_2m_max", "°C")),
        format!("temp_min ({})", unit("temperature_2m_min", "°C")),
        format!("precipitation ({})", unit("precipitation_sum", "mm")),
    ];
    let body: Vec<[String; 4]> = table
        .rows()
        .iter()
        .map(|row| {
            [
                row.date.clone(),
                number(row.temp_max),
                number(row.temp_min),
                number(row.precipitation_sum),
            ]
        })
        .collect();

    let mut widths = header.each_ref().map(|h| h.chars().count());
    for cells in &body {
        for (w, cell) in widths.iter_mut().zip(cells) {
            *w = (*w).max(cell.chars().count());
        }
    }

    table_line(&mut out, &header, &widths);
    for cells in &body {
        table_line(&mut out, cells, &widths);
    }
    missing_notice(&mut out, table.missing_fields());

    out
}

pub fn hourly(series: &HourlyTimeSeries, raw: &ForecastResponse, hours: usize) -> String {
    let mut out = String::from("Hourly series\n");
    if series.is_empty() {
        out.push_str("No hourly data available.\n");
        return out;
    }

    if let Some(first) = series.rows().first() {
        let condition = first
            .weather_code
            .map(WeatherCondition::from_wmo_code)
            .map_or("not reported", |c| c.description());
        let _ = writeln!(out, "Conditions at {}: {condition}", time(&first.timestamp));
    }

    for field in HourlyField::charted() {
        let points: Vec<_> = series.series(*field).into_iter().take(hours).collect();
        let key = field.as_str();
        match raw.unit(Section::Hourly, key) {
            Some(unit) => {
                let _ = writeln!(out, "\n{key} ({unit})");
            }
            None => {
                let _ = writeln!(out, "\n{key}");
            }
        }
        chart(&mut out, &points);
    }

    if series.dropped_rows() > 0 {
        let _ = writeln!(
            out,
            "\nNote: {} hourly rows had unreadable timestamps and were skipped.",
            series.dropped_rows()
        );
    }
    missing_notice(&mut out, series.missing_fields());

    out
}

fn chart(out: &mut String, points: &[(NaiveDateTime, f64)]) {
    if points.is_empty() {
        out.push_str("  no values reported\n");
        return;
    }

    let lo = points.iter().map(|(_, v)| *v).fold(f64::INFINITY, f64::min);
    let hi = points.iter().map(|(_, v)| *v).fold(f64::NEG_INFINITY, f64::max);
    let span = hi - lo;

    for (at, value) in points {
        let filled = if span > 0.0 {
            (((value - lo) / span) * BAR_WIDTH as f64).round() as usize
        } else {
            BAR_WIDTH / 2
        };
        let _ = writeln!(out, "  {}  {:>7.1}  {}", time(at), value, "█".repeat(filled.max(1)));
    }
}

fn table_line(out: &mut String, cells: &[String; 4], widths: &[usize; 4]) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, w)| format!("{cell:<w$}", w = *w))
        .collect();
    let _ = writeln!(out, "{}", line.join("  ").trim_end());
}

fn missing_notice(out: &mut String, missing: &[&str]) {
    if !missing.is_empty() {
        let _ = writeln!(out, "Not reported by the API: {}", missing.join(", "));
    }
}

fn number(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.1}"))
}

fn time(at: &NaiveDateTime) -> String {
    at.format("%Y-%m-%d %H:%M").to_string()
}
