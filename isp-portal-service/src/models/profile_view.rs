//! Dashboard read model assembled for one subscriber.

use super::{AccountingSession, ClientAccount, ClientTransaction, PackagePlan, Ticket, UsageStats};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Package status shown on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PackageStatus {
    Active,
    Expired,
    Inactive,
}

impl PackageStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PackageStatus::Active => "Active",
            PackageStatus::Expired => "Expired",
            PackageStatus::Inactive => "Inactive",
        }
    }
}

/// Dashboard sections that may be served degraded (empty) when their read fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DashboardSection {
    Usage,
    Payments,
    Sessions,
    Tickets,
}

impl DashboardSection {
    pub fn as_str(&self) -> &'static str {
        match self {
            DashboardSection::Usage => "usage",
            DashboardSection::Payments => "payments",
            DashboardSection::Sessions => "sessions",
            DashboardSection::Tickets => "tickets",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IspProfileView {
    pub client: ClientAccount,
    pub current_package: Option<PackagePlan>,
    pub next_package_profile: Option<String>,
    pub usage: UsageStats,
    pub payments: Vec<ClientTransaction>,
    pub sessions: Vec<AccountingSession>,
    pub tickets: Vec<Ticket>,
    pub balance: Decimal,
    pub available_balance: Decimal,
    pub valid_until: Option<DateTime<Utc>>,
    pub auto_renew: bool,
    pub package_status: PackageStatus,
    /// Sections whose read failed and were replaced by empty data.
    pub degraded_sections: Vec<DashboardSection>,
}
