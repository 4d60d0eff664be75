// Weight card domain model - Per-cat weight summary for a single day
use super::cat::CatSnapshot;
use serde::{Deserialize, Serialize};

const SPARKLINE_PADDING: f64 = 0.2;
const PALETTE: [&str; 5] = ["primary", "secondary", "warning", "success", "orange"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Day {
    #[default]
    Today,
    Yesterday,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightCard {
    pub name: String,
    pub weight: f64,
    pub weight_label: String,
    pub readings: Vec<f64>,
    pub y_min: Option<f64>,
    pub y_max: Option<f64>,
    pub palette: &'static str,
}

impl WeightCard {
    pub fn from_snapshot(index: usize, cat: &CatSnapshot, day: Day) -> Self {
        let (weight, events) = match day {
            Day::Today => (cat.today_weight, &cat.today_events),
            Day::Yesterday => (cat.yesterday_weight, &cat.yesterday_events),
        };
        let readings: Vec<f64> = events.iter().map(|e| e.event_data.weight).collect();

        // Bounds span both days so toggling the day does not rescale the sparkline.
        let all = cat
            .today_events
            .iter()
            .chain(&cat.yesterday_events)
            .map(|e| e.event_data.weight);
        let (y_min, y_max) = all.fold((None, None), |(lo, hi): (Option<f64>, Option<f64>), w| {
            (
                Some(lo.map_or(w, |lo| lo.min(w))),
                Some(hi.map_or(w, |hi| hi.max(w))),
            )
        });

        Self {
            name: cat.name.clone(),
            weight,
            weight_label: format!("{:.2} lbs", weight),
            readings,
            y_min: y_min.map(|v| v - SPARKLINE_PADDING),
            y_max: y_max.map(|v| v + SPARKLINE_PADDING),
            palette: PALETTE[index % PALETTE.len()],
        }
    }
}
