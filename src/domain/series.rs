// Series domain model - Chart-ready visit series
use super::cat::RawInterval;
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeriesPoint {
    pub x: i64,
    pub y: u32,
}

impl SeriesPoint {
    pub fn new(x: i64, y: u32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Series {
    pub name: String,
    pub points: Vec<SeriesPoint>,
}

impl Series {
    pub fn new(name: String, points: Vec<SeriesPoint>) -> Self {
        Self { name, points }
    }

    pub fn max_y(&self) -> u32 {
        self.points.iter().map(|p| p.y).max().unwrap_or(0)
    }
}

/// Build one series per cat that has activity in the window.
///
/// Series follow the order of `names` so colour assignment stays stable;
/// points keep the order the source delivered them in. Cats without
/// intervals are left out rather than drawn as a flat zero line.
pub fn build_series(names: &[String], intervals_by_cat: &HashMap<String, Vec<RawInterval>>) -> Vec<Series> {
    names
        .iter()
        .filter_map(|name| {
            let intervals = intervals_by_cat.get(name)?;
            if intervals.is_empty() {
                return None;
            }
            let points = intervals
                .iter()
                .map(|interval| SeriesPoint::new(interval.tick, interval.total_collapsed))
                .collect();
            Some(Series::new(name.clone(), points))
        })
        .collect()
}

/// Total number of visits collapsed into the given intervals.
pub fn total_visits(intervals_by_cat: &HashMap<String, Vec<RawInterval>>) -> u64 {
    intervals_by_cat
        .values()
        .flatten()
        .map(|interval| u64::from(interval.total_collapsed))
        .sum()
}
