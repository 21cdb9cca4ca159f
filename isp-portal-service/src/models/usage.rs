//! Bandwidth usage totals.

use serde::{Deserialize, Serialize};

/// Bytes transferred per aggregation window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageStats {
    pub today: u64,
    pub weekly: u64,
    pub monthly: u64,
    pub total: u64,
}

/// Fixed aggregation windows, each open-ended towards the future.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UsageWindow {
    Today,
    Week,
    Month,
    AllTime,
}

impl UsageWindow {
    pub const ALL: [UsageWindow; 4] = [
        UsageWindow::Today,
        UsageWindow::Week,
        UsageWindow::Month,
        UsageWindow::AllTime,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            UsageWindow::Today => "today",
            UsageWindow::Week => "week",
            UsageWindow::Month => "month",
            UsageWindow::AllTime => "all_time",
        }
    }
}

impl UsageStats {
    pub fn set(&mut self, window: UsageWindow, bytes: u64) {
        match window {
            UsageWindow::Today => self.today = bytes,
            UsageWindow::Week => self.weekly = bytes,
            UsageWindow::Month => self.monthly = bytes,
            UsageWindow::AllTime => self.total = bytes,
        }
    }
}
