//! Bandwidth usage over fixed calendar windows.

use super::store::UsageStore;
use crate::models::{UsageStats, UsageWindow};
use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use std::sync::Arc;
use tracing::{instrument, warn};

/// Start instants of the aggregation windows for one point in time.
///
/// Boundaries are midnights in the time zone of `now`: today, the most recent
/// Sunday on or before today, and the first of the month. All-time starts at
/// the Unix epoch, or earlier when a local week or month boundary near the
/// epoch falls before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UsageWindows {
    pub today: DateTime<Utc>,
    pub week: DateTime<Utc>,
    pub month: DateTime<Utc>,
    pub all_time: DateTime<Utc>,
}

fn midnight<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> DateTime<Utc> {
    let naive = date.and_time(NaiveTime::MIN);
    // Midnight can fall inside a DST gap; use the wall-clock value as UTC then.
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| naive.and_utc())
}

impl UsageWindows {
    pub fn starting_at<Tz: TimeZone>(now: &DateTime<Tz>) -> Self {
        let tz = now.timezone();
        let date = now.date_naive();
        let sunday = date - Duration::days(i64::from(date.weekday().num_days_from_sunday()));
        let first = NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap_or(date);

        let week = midnight(&tz, sunday);
        let month = midnight(&tz, first);

        Self {
            today: midnight(&tz, date),
            week,
            month,
            all_time: DateTime::UNIX_EPOCH.min(week).min(month),
        }
    }

    pub fn start_of(&self, window: UsageWindow) -> DateTime<Utc> {
        match window {
            UsageWindow::Today => self.today,
            UsageWindow::Week => self.week,
            UsageWindow::Month => self.month,
            UsageWindow::AllTime => self.all_time,
        }
    }
}

/// Usage totals plus the windows whose query failed and were reported as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsageReport {
    pub stats: UsageStats,
    pub failed_windows: Vec<UsageWindow>,
}

impl UsageReport {
    pub fn is_degraded(&self) -> bool {
        !self.failed_windows.is_empty()
    }
}

#[derive(Clone)]
pub struct UsageAggregator {
    store: Arc<dyn UsageStore>,
}

impl UsageAggregator {
    pub fn new(store: Arc<dyn UsageStore>) -> Self {
        Self { store }
    }

    /// Sum session octets for each window. Never fails: a window whose query
    /// errors contributes zero and is listed in `failed_windows`.
    #[instrument(skip(self, now))]
    pub async fn compute_usage<Tz: TimeZone>(
        &self,
        username: &str,
        now: &DateTime<Tz>,
    ) -> UsageReport {
        let windows = UsageWindows::starting_at(now);
        let mut report = UsageReport::default();

        for window in UsageWindow::ALL {
            match self
                .store
                .sum_octets_since(username, windows.start_of(window))
                .await
            {
                Ok(bytes) => report.stats.set(window, bytes),
                Err(e) => {
                    warn!(
                        window = window.as_str(),
                        error = %e,
                        "Usage query failed, reporting zero for window"
                    );
                    report.failed_windows.push(window);
                }
            }
        }

        report
    }
}
