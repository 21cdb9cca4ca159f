//! Services module for isp-portal-service.

pub mod accounts;
pub mod database;
pub mod history;
pub mod login;
pub mod memory;
pub mod metrics;
pub mod password;
pub mod profile;
pub mod store;
pub mod subscription;
pub mod tickets;
pub mod usage;

#[cfg(test)]
pub(crate) mod testing;

pub use accounts::AccountService;
pub use database::Database;
pub use history::BillingHistoryReader;
pub use login::{AccountLoginLink, LoginCredentials};
pub use memory::MemoryStore;
pub use metrics::{
    get_metrics, init_metrics, record_degraded_read, record_error, record_login_attempt,
    record_profile_view, record_ticket_created,
};
pub use profile::ProfileAggregator;
pub use store::{
    AccountStore, HistoryStore, PortalStore, PortalUserStore, StoreHealth, TicketStore,
    UsageStore,
};
pub use subscription::resolve_status;
pub use tickets::TicketIntake;
pub use usage::{UsageAggregator, UsageReport, UsageWindows};
