// Aggregation orchestrator - Range selection state machine
//
// Driven by discrete events. `handle` never performs I/O; when data has to
// be fetched it returns an `Effect` for the caller to run and report back.
use crate::application::interval_cache::{CacheEntry, IntervalCache};
use crate::domain::cat::{CatIntervals, CatSnapshot, RawInterval};
use crate::domain::chart::ChartDescriptor;
use crate::domain::range::{resolve, QueryWindow, RangeToken, WindowSpec};
use crate::domain::series::{build_series, total_visits};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Idle,
    Fetching,
    Ready,
    Error,
}

#[derive(Debug, Clone)]
pub enum Event {
    Select(RangeToken),
    FetchResolved {
        range: RangeToken,
        window: QueryWindow,
        cats: Vec<CatIntervals>,
    },
    FetchFailed {
        range: RangeToken,
        error: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    Fetch { range: RangeToken, window: QueryWindow },
}

/// What the charting surface renders: the last ready chart plus progress.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartView {
    pub selected: Option<RangeToken>,
    pub phase: Phase,
    pub loading: bool,
    pub chart: Option<ChartDescriptor>,
}

#[derive(Debug)]
pub struct AggregationOrchestrator {
    cats: Vec<CatSnapshot>,
    cache: IntervalCache,
    selected: Option<RangeToken>,
    phase: Phase,
    chart: Option<ChartDescriptor>,
}

impl AggregationOrchestrator {
    pub fn new(cats: Vec<CatSnapshot>) -> Self {
        Self {
            cats,
            cache: IntervalCache::new(),
            selected: None,
            phase: Phase::Idle,
            chart: None,
        }
    }

    pub fn cats(&self) -> &[CatSnapshot] {
        &self.cats
    }

    #[cfg(test)]
    pub fn cached(&self, range: RangeToken) -> Option<&CacheEntry> {
        self.cache.get(range)
    }

    pub fn view(&self) -> ChartView {
        ChartView {
            selected: self.selected,
            phase: self.phase,
            // a failed fetch keeps the flag raised until the range is retried
            loading: self.phase != Phase::Ready,
            chart: self.chart.clone(),
        }
    }

    pub fn handle(&mut self, event: Event, today: NaiveDate) -> Effect {
        match event {
            Event::Select(range) => self.select(range, today),
            Event::FetchResolved { range, window, cats } => {
                self.fetch_resolved(range, window, cats);
                Effect::None
            }
            Event::FetchFailed { range, error } => {
                self.fetch_failed(range, &error);
                Effect::None
            }
        }
    }

    fn select(&mut self, range: RangeToken, today: NaiveDate) -> Effect {
        if self.selected == Some(range) && matches!(self.phase, Phase::Ready | Phase::Fetching) {
            return Effect::None;
        }
        self.selected = Some(range);

        let spec = resolve(range, today);
        let window = match spec {
            WindowSpec::Local => {
                self.chart = Some(self.local_chart(range));
                self.phase = Phase::Ready;
                return Effect::None;
            }
            WindowSpec::Remote(window) => window,
        };

        if let Some(entry) = self.cache.get(range) {
            tracing::debug!("Cache hit for {}", range);
            self.chart = Some(chart_from_entry(entry, spec.suppress_time()));
            self.phase = Phase::Ready;
            return Effect::None;
        }

        self.phase = Phase::Fetching;
        if self.cache.has_in_flight(range) {
            tracing::debug!("Fetch for {} already in flight", range);
            return Effect::None;
        }

        tracing::debug!("Cache miss for {}, fetching", range);
        self.cache.mark_in_flight(range);
        Effect::Fetch { range, window }
    }

    fn fetch_resolved(&mut self, range: RangeToken, window: QueryWindow, cats: Vec<CatIntervals>) {
        self.cache.clear_in_flight(range);
        let entry = CacheEntry::from_intervals(range, cats);
        tracing::debug!(
            "Fetched {} cats for {} ({} visits)",
            entry.cats.len(),
            range,
            entry.visit_count
        );

        if self.selected == Some(range) && self.phase == Phase::Fetching {
            self.chart = Some(chart_from_entry(&entry, window.suppress_time()));
            self.phase = Phase::Ready;
        }
        self.cache.put(range, entry);
    }

    fn fetch_failed(&mut self, range: RangeToken, error: &str) {
        self.cache.clear_in_flight(range);
        tracing::warn!("Error fetching intervals for {}: {}", range, error);

        if self.selected == Some(range) {
            self.phase = Phase::Error;
        }
    }

    fn local_chart(&self, range: RangeToken) -> ChartDescriptor {
        let names: Vec<String> = self.cats.iter().map(|c| c.name.clone()).collect();
        let intervals_by_cat: HashMap<String, Vec<RawInterval>> = self
            .cats
            .iter()
            .map(|cat| {
                let visits = match range {
                    RangeToken::Yesterday => &cat.yesterday_visits,
                    _ => &cat.today_visits,
                };
                (cat.name.clone(), visits.clone())
            })
            .collect();

        let series = build_series(&names, &intervals_by_cat);
        ChartDescriptor::new(range, series, false, total_visits(&intervals_by_cat))
    }
}

fn chart_from_entry(entry: &CacheEntry, suppress_time: bool) -> ChartDescriptor {
    let series = build_series(&entry.cats, &entry.intervals_by_cat);
    ChartDescriptor::new(entry.range, series, suppress_time, entry.visit_count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::series::SeriesPoint;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, 15).unwrap()
    }

    fn cats() -> Vec<CatSnapshot> {
        vec![
            CatSnapshot::new("Tom")
                .with_today_visits(vec![RawInterval::new(100, 2)])
                .with_yesterday_visits(vec![RawInterval::new(50, 1)]),
            CatSnapshot::new("Jerry"),
        ]
    }

    fn expect_fetch(effect: Effect) -> (RangeToken, QueryWindow) {
        match effect {
            Effect::Fetch { range, window } => (range, window),
            Effect::None => panic!("expected a fetch"),
        }
    }

    #[test]
    fn test_today_builds_from_snapshot() {
        let mut orchestrator = AggregationOrchestrator::new(cats());
        assert_eq!(orchestrator.view().phase, Phase::Idle);

        let effect = orchestrator.handle(Event::Select(RangeToken::Today), today());
        assert_eq!(effect, Effect::None);

        let view = orchestrator.view();
        assert_eq!(view.phase, Phase::Ready);
        assert!(!view.loading);
        let chart = view.chart.unwrap();
        assert_eq!(chart.series.len(), 1);
        assert_eq!(chart.series[0].name, "Tom");
        assert_eq!(chart.series[0].points, vec![SeriesPoint::new(100, 2)]);
        assert_eq!(chart.total_count, 2);
        assert!(!chart.suppress_time);
    }

    #[test]
    fn test_yesterday_uses_yesterday_visits() {
        let mut orchestrator = AggregationOrchestrator::new(cats());
        orchestrator.handle(Event::Select(RangeToken::Yesterday), today());
        let chart = orchestrator.view().chart.unwrap();
        assert_eq!(chart.range, RangeToken::Yesterday);
        assert_eq!(chart.series[0].points, vec![SeriesPoint::new(50, 1)]);
    }

    #[test]
    fn test_remote_miss_fetches_then_caches() {
        let mut orchestrator = AggregationOrchestrator::new(cats());
        orchestrator.handle(Event::Select(RangeToken::Today), today());

        let (range, window) = expect_fetch(orchestrator.handle(Event::Select(RangeToken::Month), today()));
        assert_eq!(range, RangeToken::Month);
        assert_eq!(window.start_param(), "2024.02.01");

        // previous chart stays up while fetching
        let view = orchestrator.view();
        assert_eq!(view.phase, Phase::Fetching);
        assert!(view.loading);
        assert_eq!(view.chart.unwrap().range, RangeToken::Today);

        orchestrator.handle(
            Event::FetchResolved {
                range,
                window,
                cats: vec![CatIntervals::new("Tom", vec![RawInterval::new(1, 3)])],
            },
            today(),
        );
        let chart = orchestrator.view().chart.unwrap();
        assert_eq!(chart.range, RangeToken::Month);
        assert!(chart.suppress_time);
        assert_eq!(chart.total_count, 3);

        orchestrator.handle(Event::Select(RangeToken::Today), today());
        let effect = orchestrator.handle(Event::Select(RangeToken::Month), today());
        assert_eq!(effect, Effect::None);
        assert_eq!(orchestrator.view().chart.unwrap().range, RangeToken::Month);
    }

    #[test]
    fn test_duplicate_selection_while_fetching() {
        let mut orchestrator = AggregationOrchestrator::new(cats());
        expect_fetch(orchestrator.handle(Event::Select(RangeToken::Week), today()));
        assert_eq!(orchestrator.handle(Event::Select(RangeToken::Week), today()), Effect::None);

        // switching away and back must not start a second fetch either
        orchestrator.handle(Event::Select(RangeToken::Today), today());
        assert_eq!(orchestrator.handle(Event::Select(RangeToken::Week), today()), Effect::None);
        assert_eq!(orchestrator.view().phase, Phase::Fetching);
    }

    #[test]
    fn test_late_response_for_other_range_only_caches() {
        let mut orchestrator = AggregationOrchestrator::new(cats());
        let (range, window) = expect_fetch(orchestrator.handle(Event::Select(RangeToken::Week), today()));
        orchestrator.handle(Event::Select(RangeToken::Today), today());

        orchestrator.handle(
            Event::FetchResolved {
                range,
                window,
                cats: vec![CatIntervals::new("Jerry", vec![RawInterval::new(7, 1)])],
            },
            today(),
        );
        assert_eq!(orchestrator.view().chart.unwrap().range, RangeToken::Today);
        assert!(orchestrator.cached(RangeToken::Week).is_some());
    }

    #[test]
    fn test_failure_keeps_last_chart_and_allows_retry() {
        let mut orchestrator = AggregationOrchestrator::new(cats());
        orchestrator.handle(Event::Select(RangeToken::Today), today());
        let (range, _) = expect_fetch(orchestrator.handle(Event::Select(RangeToken::Last7), today()));

        orchestrator.handle(
            Event::FetchFailed {
                range,
                error: "connection reset".to_string(),
            },
            today(),
        );
        let view = orchestrator.view();
        assert_eq!(view.phase, Phase::Error);
        assert!(view.loading);
        assert_eq!(view.chart.unwrap().range, RangeToken::Today);
        assert!(orchestrator.cached(RangeToken::Last7).is_none());

        expect_fetch(orchestrator.handle(Event::Select(RangeToken::Last7), today()));
    }

    #[test]
    fn test_reselecting_ready_range_is_noop() {
        let mut orchestrator = AggregationOrchestrator::new(cats());
        orchestrator.handle(Event::Select(RangeToken::Today), today());
        let before = orchestrator.view();
        assert_eq!(orchestrator.handle(Event::Select(RangeToken::Today), today()), Effect::None);
        assert_eq!(orchestrator.view(), before);
    }
}
