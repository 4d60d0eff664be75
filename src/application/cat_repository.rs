// Repository trait for cat activity data access
use crate::domain::cat::{CatIntervals, CatSnapshot};
use crate::domain::range::QueryWindow;
use async_trait::async_trait;

#[async_trait]
pub trait CatRepository: Send + Sync {
    /// Load every cat with its embedded today/yesterday visits and weights
    async fn list_cats(&self) -> anyhow::Result<Vec<CatSnapshot>>;

    /// Query visit intervals for a window, collapsed at the window's bucket width
    async fn query_intervals(&self, window: &QueryWindow) -> anyhow::Result<Vec<CatIntervals>>;
}
