// Range domain model - Range tokens and their resolved query windows
use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const HOUR_MS: u64 = 60 * 60 * 1000;
pub const DAY_MS: u64 = 24 * HOUR_MS;

/// Bucket width for `week`. Older dashboards collapsed weeks into 4h buckets.
pub const WEEK_BUCKET_MS: u64 = 6 * HOUR_MS;

/// Date format expected by the windowed interval query.
const QUERY_DATE_FORMAT: &str = "%Y.%m.%d";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported range token: {token}")]
pub struct UnsupportedRangeError {
    pub token: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RangeToken {
    Today,
    Yesterday,
    Week,
    Month,
    Last7,
    Last30,
}

impl RangeToken {
    pub const ALL: [RangeToken; 6] = [
        RangeToken::Today,
        RangeToken::Yesterday,
        RangeToken::Week,
        RangeToken::Month,
        RangeToken::Last7,
        RangeToken::Last30,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RangeToken::Today => "today",
            RangeToken::Yesterday => "yesterday",
            RangeToken::Week => "week",
            RangeToken::Month => "month",
            RangeToken::Last7 => "last7",
            RangeToken::Last30 => "last30",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RangeToken::Today => "Today",
            RangeToken::Yesterday => "Yesterday",
            RangeToken::Week => "This Week",
            RangeToken::Month => "This Month",
            RangeToken::Last7 => "Last 7 Days",
            RangeToken::Last30 => "Last 30 Days",
        }
    }

    /// Local tokens are served from the snapshot loaded at startup.
    pub fn is_local(&self) -> bool {
        matches!(self, RangeToken::Today | RangeToken::Yesterday)
    }
}

impl fmt::Display for RangeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RangeToken {
    type Err = UnsupportedRangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RangeToken::ALL
            .into_iter()
            .find(|token| token.as_str() == s)
            .ok_or_else(|| UnsupportedRangeError {
                token: s.to_string(),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryWindow {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub bucket_width_ms: u64,
}

impl QueryWindow {
    pub fn start_param(&self) -> String {
        self.start_date.format(QUERY_DATE_FORMAT).to_string()
    }

    pub fn end_param(&self) -> String {
        self.end_date.format(QUERY_DATE_FORMAT).to_string()
    }

    /// Windows collapsed into whole days carry no meaningful time of day.
    pub fn suppress_time(&self) -> bool {
        self.bucket_width_ms >= DAY_MS
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowSpec {
    Local,
    Remote(QueryWindow),
}

impl WindowSpec {
    pub fn suppress_time(&self) -> bool {
        match self {
            WindowSpec::Local => false,
            WindowSpec::Remote(window) => window.suppress_time(),
        }
    }
}

/// Resolve a range token against the current calendar day.
pub fn resolve(token: RangeToken, today: NaiveDate) -> WindowSpec {
    let window = match token {
        RangeToken::Today | RangeToken::Yesterday => return WindowSpec::Local,
        RangeToken::Week => {
            let sunday = today - Days::new(today.weekday().num_days_from_sunday().into());
            QueryWindow {
                start_date: sunday,
                end_date: sunday + Days::new(6),
                bucket_width_ms: WEEK_BUCKET_MS,
            }
        }
        RangeToken::Month => {
            let first = today.with_day(1).unwrap_or(today);
            let last = (first + Months::new(1)).pred_opt().unwrap_or(first);
            QueryWindow {
                start_date: first,
                end_date: last,
                bucket_width_ms: DAY_MS,
            }
        }
        RangeToken::Last7 => QueryWindow {
            start_date: today - Days::new(7),
            end_date: today,
            bucket_width_ms: DAY_MS,
        },
        RangeToken::Last30 => QueryWindow {
            start_date: today - Days::new(30),
            end_date: today,
            bucket_width_ms: DAY_MS,
        },
    };

    tracing::debug!(
        "Resolved {} to {}..{} ({}ms buckets)",
        token,
        window.start_param(),
        window.end_param(),
        window.bucket_width_ms
    );
    WindowSpec::Remote(window)
}
