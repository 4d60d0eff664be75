// Cat domain model - Snapshots and raw activity intervals
use serde::{Deserialize, Serialize};

/// One collapsed bucket of visits for a single cat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawInterval {
    pub tick: i64,
    pub total_collapsed: u32,
}

#[cfg(test)]
impl RawInterval {
    pub fn new(tick: i64, total_collapsed: u32) -> Self {
        Self {
            tick,
            total_collapsed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EventData {
    #[serde(default)]
    pub weight: f64,
}

/// A scale event recorded while the cat was on the litter box.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WeightEvent {
    #[serde(default)]
    pub timestamp: Option<i64>,
    #[serde(default)]
    pub event_data: EventData,
}

#[cfg(test)]
impl WeightEvent {
    pub fn new(weight: f64) -> Self {
        Self {
            timestamp: None,
            event_data: EventData { weight },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CatSnapshot {
    pub name: String,
    #[serde(default)]
    pub today_visits: Vec<RawInterval>,
    #[serde(default)]
    pub yesterday_visits: Vec<RawInterval>,
    #[serde(default)]
    pub today_events: Vec<WeightEvent>,
    #[serde(default)]
    pub yesterday_events: Vec<WeightEvent>,
    #[serde(default)]
    pub today_weight: f64,
    #[serde(default)]
    pub yesterday_weight: f64,
}

#[cfg(test)]
impl CatSnapshot {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_today_visits(mut self, visits: Vec<RawInterval>) -> Self {
        self.today_visits = visits;
        self
    }

    pub fn with_yesterday_visits(mut self, visits: Vec<RawInterval>) -> Self {
        self.yesterday_visits = visits;
        self
    }
}

/// A cat's intervals as returned by the windowed interval query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatIntervals {
    pub name: String,
    #[serde(default)]
    pub intervals: Vec<RawInterval>,
}

#[cfg(test)]
impl CatIntervals {
    pub fn new(name: impl Into<String>, intervals: Vec<RawInterval>) -> Self {
        Self {
            name: name.into(),
            intervals,
        }
    }
}
