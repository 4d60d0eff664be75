// Axis bounds and label formatting for visit charts
use super::series::Series;
use chrono::{DateTime, TimeZone};
use serde::Serialize;
use std::fmt::Display;

const MIN_AXIS_CEILING: u64 = 2;
const MAX_TICKS: u64 = 6;
const DEFAULT_TICKS: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AxisBounds {
    pub min: f64,
    pub max: f64,
    pub tick_count: u32,
}

/// Size the y axis for the stacked total of every series' peak.
///
/// The ceiling never drops below 2 so a single visit still gets a usable
/// axis. The floor is always 0.
pub fn compute_bounds(series: &[Series]) -> AxisBounds {
    let stacked: u64 = series.iter().map(|s| u64::from(s.max_y())).sum();

    let tick_count = if stacked > 0 {
        stacked.min(MAX_TICKS) as u32
    } else {
        DEFAULT_TICKS
    };

    AxisBounds {
        min: 0.0,
        max: stacked.max(MIN_AXIS_CEILING) as f64,
        tick_count,
    }
}

/// Render a y-axis tick. Fractional ticks are blanked.
pub fn format_axis_label(value: f64) -> String {
    if !value.is_finite() || value.fract() != 0.0 {
        return String::new();
    }
    let n = value as i64;
    if n == 1 {
        format!("{} visit", n)
    } else {
        format!("{} visits", n)
    }
}

/// Tick labels for every step between the axis floor and ceiling.
pub fn axis_labels(bounds: &AxisBounds) -> Vec<String> {
    let steps = bounds.tick_count.max(1);
    let step = (bounds.max - bounds.min) / f64::from(steps);
    (0..=steps)
        .map(|i| format_axis_label(bounds.min + step * f64::from(i)))
        .collect()
}

/// Render a point timestamp for tooltips and CSV export.
pub fn format_tooltip_date<Tz>(timestamp_ms: i64, suppress_time: bool, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let Some(utc) = DateTime::from_timestamp_millis(timestamp_ms) else {
        return String::new();
    };
    let local = utc.with_timezone(tz);
    if suppress_time {
        local.format("%m/%d/%Y").to_string()
    } else {
        local.format("%m/%d/%Y %H:%M:%S").to_string()
    }
}
