// Dashboard session - Runs orchestrator effects against the repository
use crate::application::aggregation::{AggregationOrchestrator, ChartView, Effect, Event};
use crate::application::cat_repository::CatRepository;
use crate::application::clock::Clock;
use crate::domain::cat::CatSnapshot;
use crate::domain::range::{QueryWindow, RangeToken};
use anyhow::Context;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

#[derive(Clone)]
pub struct DashboardSession {
    orchestrator: Arc<Mutex<AggregationOrchestrator>>,
    repository: Arc<dyn CatRepository>,
    clock: Arc<dyn Clock>,
}

impl DashboardSession {
    pub fn new(cats: Vec<CatSnapshot>, repository: Arc<dyn CatRepository>, clock: Arc<dyn Clock>) -> Self {
        Self {
            orchestrator: Arc::new(Mutex::new(AggregationOrchestrator::new(cats))),
            repository,
            clock,
        }
    }

    /// Load the cat snapshot once and select the initial range.
    pub async fn start(
        repository: Arc<dyn CatRepository>,
        clock: Arc<dyn Clock>,
        initial: RangeToken,
    ) -> anyhow::Result<Self> {
        let cats = repository
            .list_cats()
            .await
            .context("Failed to load cats")?;
        tracing::info!("Loaded {} cats", cats.len());

        let session = Self::new(cats, repository, clock);
        session.select(initial).await;
        Ok(session)
    }

    /// Select a range. Returns the handle of the fetch it started, if any.
    ///
    /// The orchestrator lock is released before the fetch runs, so other
    /// ranges can be selected (and fetched) while this one is pending.
    pub async fn select(&self, range: RangeToken) -> Option<JoinHandle<()>> {
        let effect = {
            let mut orchestrator = self.orchestrator.lock().await;
            orchestrator.handle(Event::Select(range), self.clock.today())
        };

        match effect {
            Effect::None => None,
            Effect::Fetch { range, window } => Some(tokio::spawn(run_fetch(
                self.orchestrator.clone(),
                self.repository.clone(),
                self.clock.clone(),
                range,
                window,
            ))),
        }
    }

    pub async fn view(&self) -> ChartView {
        self.orchestrator.lock().await.view()
    }

    pub async fn cats(&self) -> Vec<CatSnapshot> {
        self.orchestrator.lock().await.cats().to_vec()
    }
}

async fn run_fetch(
    orchestrator: Arc<Mutex<AggregationOrchestrator>>,
    repository: Arc<dyn CatRepository>,
    clock: Arc<dyn Clock>,
    range: RangeToken,
    window: QueryWindow,
) {
    let event = match repository.query_intervals(&window).await {
        Ok(cats) => Event::FetchResolved { range, window, cats },
        Err(e) => Event::FetchFailed {
            range,
            error: format!("{:#}", e),
        },
    };
    orchestrator.lock().await.handle(event, clock.today());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::aggregation::Phase;
    use crate::application::clock::FixedClock;
    use crate::domain::cat::{CatIntervals, RawInterval};
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use tokio::sync::Semaphore;

    #[derive(Default)]
    struct FakeRepository {
        list_calls: AtomicUsize,
        interval_calls: AtomicUsize,
        fail: AtomicBool,
        gate: Option<Arc<Semaphore>>,
    }

    impl FakeRepository {
        fn gated(gate: Arc<Semaphore>) -> Self {
            Self {
                gate: Some(gate),
                ..Self::default()
            }
        }

        fn interval_calls(&self) -> usize {
            self.interval_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl CatRepository for FakeRepository {
        async fn list_cats(&self) -> anyhow::Result<Vec<CatSnapshot>> {
            self.list_calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![
                CatSnapshot::new("Tom").with_today_visits(vec![RawInterval::new(100, 2)]),
                CatSnapshot::new("Jerry"),
            ])
        }

        async fn query_intervals(&self, _window: &QueryWindow) -> anyhow::Result<Vec<CatIntervals>> {
            self.interval_calls.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.gate {
                gate.acquire().await?.forget();
            }
            if self.fail.load(Ordering::SeqCst) {
                anyhow::bail!("data source unavailable");
            }
            Ok(vec![
                CatIntervals::new("Tom", vec![RawInterval::new(1_707_955_200_000, 4)]),
                CatIntervals::new("Jerry", vec![]),
            ])
        }
    }

    fn clock() -> Arc<dyn Clock> {
        Arc::new(FixedClock(NaiveDate::from_ymd_opt(2024, 2, 15).unwrap()))
    }

    async fn start(repository: Arc<FakeRepository>) -> DashboardSession {
        DashboardSession::start(repository, clock(), RangeToken::Today)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_start_loads_cats_once_and_renders_today() {
        let repository = Arc::new(FakeRepository::default());
        let session = start(repository.clone()).await;

        assert_eq!(repository.list_calls.load(Ordering::SeqCst), 1);
        assert_eq!(session.cats().await.len(), 2);
        let view = session.view().await;
        assert_eq!(view.phase, Phase::Ready);
        assert_eq!(view.chart.unwrap().series[0].name, "Tom");
        assert_eq!(repository.interval_calls(), 0);
    }

    #[tokio::test]
    async fn test_remote_range_fetched_once_per_session() {
        let repository = Arc::new(FakeRepository::default());
        let session = start(repository.clone()).await;

        session.select(RangeToken::Week).await.unwrap().await.unwrap();
        assert_eq!(repository.interval_calls(), 1);
        assert_eq!(session.view().await.chart.unwrap().range, RangeToken::Week);

        assert!(session.select(RangeToken::Week).await.is_none());
        assert!(session.select(RangeToken::Today).await.is_none());
        assert!(session.select(RangeToken::Week).await.is_none());
        assert_eq!(repository.interval_calls(), 1);
    }

    #[tokio::test]
    async fn test_local_range_never_fetches() {
        let repository = Arc::new(FakeRepository::default());
        let session = start(repository.clone()).await;

        session.select(RangeToken::Week).await.unwrap().await.unwrap();
        assert!(session.select(RangeToken::Today).await.is_none());
        assert!(session.select(RangeToken::Yesterday).await.is_none());
        assert!(session.select(RangeToken::Today).await.is_none());
        assert_eq!(repository.interval_calls(), 1);
    }

    #[tokio::test]
    async fn test_pending_fetch_is_not_duplicated() {
        let gate = Arc::new(Semaphore::new(0));
        let repository = Arc::new(FakeRepository::gated(gate.clone()));
        let session = start(repository.clone()).await;

        let week = session.select(RangeToken::Week).await.unwrap();
        let month = session.select(RangeToken::Month).await.unwrap();
        assert!(session.select(RangeToken::Week).await.is_none());

        let view = session.view().await;
        assert_eq!(view.selected, Some(RangeToken::Week));
        assert!(view.loading);
        assert_eq!(view.chart.unwrap().range, RangeToken::Today);

        gate.add_permits(2);
        week.await.unwrap();
        month.await.unwrap();

        assert_eq!(repository.interval_calls(), 2);
        let view = session.view().await;
        assert_eq!(view.phase, Phase::Ready);
        assert_eq!(view.chart.unwrap().range, RangeToken::Week);
    }

    #[tokio::test]
    async fn test_failed_fetch_keeps_chart_and_retries() {
        let repository = Arc::new(FakeRepository::default());
        repository.fail.store(true, Ordering::SeqCst);
        let session = start(repository.clone()).await;

        session.select(RangeToken::Last30).await.unwrap().await.unwrap();
        let view = session.view().await;
        assert_eq!(view.phase, Phase::Error);
        assert!(view.loading);
        assert_eq!(view.chart.unwrap().range, RangeToken::Today);

        repository.fail.store(false, Ordering::SeqCst);
        session.select(RangeToken::Last30).await.unwrap().await.unwrap();
        assert_eq!(repository.interval_calls(), 2);
        let chart = session.view().await.chart.unwrap();
        assert_eq!(chart.range, RangeToken::Last30);
        assert!(chart.suppress_time);
        assert_eq!(chart.total_count, 4);
    }
}
