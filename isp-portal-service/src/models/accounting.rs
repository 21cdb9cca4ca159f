//! Network accounting session (RADIUS accounting record) model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One network session with its traffic counters.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AccountingSession {
    pub radacctid: i64,
    pub acctsessionid: String,
    pub acctuniqueid: String,
    pub username: String,
    pub acctstarttime: Option<DateTime<Utc>>,
    pub acctstoptime: Option<DateTime<Utc>>,
    pub acctsessiontime: Option<i64>,
    pub acctinputoctets: Option<i64>,
    pub acctoutputoctets: Option<i64>,
    pub framedipaddress: String,
    pub acctterminatecause: String,
}

impl AccountingSession {
    /// Input plus output octets; missing or negative counters contribute zero.
    pub fn total_octets(&self) -> u64 {
        let octets = |v: Option<i64>| v.and_then(|n| u64::try_from(n).ok()).unwrap_or(0);
        octets(self.acctinputoctets).saturating_add(octets(self.acctoutputoctets))
    }
}
