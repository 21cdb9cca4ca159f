//! Storage seams used by the portal components.
//!
//! Each component receives only the traits it reads from. Both [`Database`]
//! and [`MemoryStore`] implement every trait, so either can back the service.
//!
//! [`Database`]: super::Database
//! [`MemoryStore`]: super::MemoryStore

use crate::models::{
    AccountingSession, ClientAccount, ClientTransaction, NewPortalUser, NewTicket, PackagePlan,
    PortalProfile, PortalUser, Ticket, UpdateContactDetails,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use service_core::error::AppError;

/// Subscriber accounts and the package catalog.
#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn find_client_by_id(&self, client_id: i64) -> Result<Option<ClientAccount>, AppError>;

    async fn find_client_by_username(
        &self,
        username: &str,
    ) -> Result<Option<ClientAccount>, AppError>;

    /// First package (lowest id) with the given profile name, active or not.
    async fn find_package_by_profile(
        &self,
        profile_name: &str,
    ) -> Result<Option<PackagePlan>, AppError>;

    /// First active package (lowest id) with the given profile name.
    async fn find_active_package_by_profile(
        &self,
        profile_name: &str,
    ) -> Result<Option<PackagePlan>, AppError>;

    /// Active packages ordered by price, then name.
    async fn list_active_packages(&self) -> Result<Vec<PackagePlan>, AppError>;

    /// Flip `auto_renew` in a single row update. `None` when the account is missing.
    async fn toggle_auto_renew(&self, client_id: i64) -> Result<Option<bool>, AppError>;

    async fn update_contact_details(
        &self,
        client_id: i64,
        details: &UpdateContactDetails,
    ) -> Result<Option<ClientAccount>, AppError>;

    async fn set_next_package(
        &self,
        client_id: i64,
        profile_name: &str,
    ) -> Result<Option<ClientAccount>, AppError>;
}

/// Raw accounting records summed into usage windows.
#[async_trait]
pub trait UsageStore: Send + Sync {
    /// Input plus output octets of every session for `username` that started
    /// at or after `since`. There is no upper bound.
    async fn sum_octets_since(&self, username: &str, since: DateTime<Utc>)
        -> Result<u64, AppError>;
}

/// Ledger entries and accounting sessions, newest first.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    async fn recent_payments(
        &self,
        username: &str,
        limit: i64,
    ) -> Result<Vec<ClientTransaction>, AppError>;

    async fn recent_sessions(
        &self,
        username: &str,
        limit: i64,
    ) -> Result<Vec<AccountingSession>, AppError>;
}

#[async_trait]
pub trait TicketStore: Send + Sync {
    async fn insert_ticket(&self, ticket: &NewTicket) -> Result<Ticket, AppError>;

    /// Tickets for a client, newest first.
    async fn recent_tickets(&self, client_id: i64, limit: i64) -> Result<Vec<Ticket>, AppError>;
}

/// Generic portal users linked to subscriber accounts by email.
#[async_trait]
pub trait PortalUserStore: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<PortalUser>, AppError>;

    /// Create the user and its profile atomically. An existing user with the
    /// same email is returned unchanged.
    async fn create_user_with_profile(&self, user: &NewPortalUser)
        -> Result<PortalUser, AppError>;

    async fn find_profile_by_user(&self, user_id: i64)
        -> Result<Option<PortalProfile>, AppError>;
}

#[async_trait]
pub trait StoreHealth: Send + Sync {
    async fn health_check(&self) -> Result<(), AppError>;
}

/// Everything the portal needs from one backing store.
pub trait PortalStore:
    AccountStore + UsageStore + HistoryStore + TicketStore + PortalUserStore + StoreHealth
{
}

impl<T> PortalStore for T where
    T: AccountStore + UsageStore + HistoryStore + TicketStore + PortalUserStore + StoreHealth
{
}
