// Chart domain model - Descriptor handed to the charting surface
use super::bounds::{axis_labels, compute_bounds, format_tooltip_date, AxisBounds};
use super::range::RangeToken;
use super::series::Series;
use chrono::{Local, TimeZone};
use serde::Serialize;
use std::fmt::Display;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartDescriptor {
    pub range: RangeToken,
    pub series: Vec<Series>,
    pub bounds: AxisBounds,
    pub axis_labels: Vec<String>,
    pub suppress_time: bool,
    pub total_count: u64,
}

impl ChartDescriptor {
    pub fn new(range: RangeToken, series: Vec<Series>, suppress_time: bool, total_count: u64) -> Self {
        let bounds = compute_bounds(&series);
        let axis_labels = axis_labels(&bounds);
        Self {
            range,
            series,
            bounds,
            axis_labels,
            suppress_time,
            total_count,
        }
    }

    /// CSV export with one row per point, dates in local time.
    pub fn to_csv(&self) -> String {
        self.to_csv_in(&Local)
    }

    pub fn to_csv_in<Tz>(&self, tz: &Tz) -> String
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let mut csv = String::from("cat,date,visits\n");
        for series in &self.series {
            for point in &series.points {
                csv.push_str(&format!(
                    "{},{},{}\n",
                    csv_field(&series.name),
                    format_tooltip_date(point.x, self.suppress_time, tz),
                    point.y
                ));
            }
        }
        csv
    }
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
