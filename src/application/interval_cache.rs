// Session-scoped cache of remote range results
use crate::domain::cat::{CatIntervals, RawInterval};
use crate::domain::range::RangeToken;
use crate::domain::series::total_visits;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    pub range: RangeToken,
    pub visit_count: u64,
    /// Cat names in the order the source returned them.
    pub cats: Vec<String>,
    pub intervals_by_cat: HashMap<String, Vec<RawInterval>>,
}

impl CacheEntry {
    pub fn from_intervals(range: RangeToken, cats: Vec<CatIntervals>) -> Self {
        let names = cats.iter().map(|c| c.name.clone()).collect();
        let intervals_by_cat: HashMap<String, Vec<RawInterval>> =
            cats.into_iter().map(|c| (c.name, c.intervals)).collect();
        Self {
            range,
            visit_count: total_visits(&intervals_by_cat),
            cats: names,
            intervals_by_cat,
        }
    }
}

/// Entries are never evicted or refreshed for the life of the session.
#[derive(Debug, Default)]
pub struct IntervalCache {
    entries: HashMap<RangeToken, CacheEntry>,
    in_flight: HashSet<RangeToken>,
}

impl IntervalCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, token: RangeToken) -> Option<&CacheEntry> {
        self.entries.get(&token)
    }

    pub fn put(&mut self, token: RangeToken, entry: CacheEntry) {
        if token.is_local() {
            tracing::warn!("Refusing to cache local range {}", token);
            return;
        }
        self.entries.insert(token, entry);
    }

    pub fn has_in_flight(&self, token: RangeToken) -> bool {
        self.in_flight.contains(&token)
    }

    pub fn mark_in_flight(&mut self, token: RangeToken) {
        self.in_flight.insert(token);
    }

    pub fn clear_in_flight(&mut self, token: RangeToken) {
        self.in_flight.remove(&token);
    }
}
