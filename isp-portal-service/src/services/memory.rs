//! In-memory store for local development and tests.

use super::store::{
    AccountStore, HistoryStore, PortalUserStore, StoreHealth, TicketStore, UsageStore,
};
use crate::models::{
    AccountingSession, ClientAccount, ClientTransaction, NewPortalUser, NewTicket, PackagePlan,
    PortalProfile, PortalUser, Ticket, UpdateContactDetails,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use service_core::error::AppError;
use tokio::sync::RwLock;

#[derive(Default)]
struct MemoryData {
    clients: Vec<ClientAccount>,
    packages: Vec<PackagePlan>,
    transactions: Vec<ClientTransaction>,
    sessions: Vec<AccountingSession>,
    tickets: Vec<Ticket>,
    users: Vec<PortalUser>,
    profiles: Vec<PortalProfile>,
}

impl MemoryData {
    fn client_mut(&mut self, client_id: i64) -> Option<&mut ClientAccount> {
        self.clients.iter_mut().find(|c| c.id == client_id)
    }
}

/// Store kept entirely in process memory. Rows are lost on restart.
#[derive(Default)]
pub struct MemoryStore {
    data: RwLock<MemoryData>,
}

fn next_id(ids: impl Iterator<Item = i64>) -> i64 {
    ids.max().unwrap_or(0) + 1
}

fn bounded<T>(mut rows: Vec<T>, limit: i64) -> Vec<T> {
    rows.truncate(usize::try_from(limit).unwrap_or(0));
    rows
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a subscriber account. Negative balances are rejected like the
    /// table constraint does.
    pub async fn insert_client(&self, client: ClientAccount) -> Result<(), AppError> {
        if client.balance < Decimal::ZERO {
            return Err(AppError::BadRequest(anyhow::anyhow!(
                "Client balance must not be negative"
            )));
        }
        let mut data = self.data.write().await;
        if data.clients.iter().any(|c| c.username == client.username) {
            return Err(AppError::BadRequest(anyhow::anyhow!(
                "Username '{}' already exists",
                client.username
            )));
        }
        data.clients.push(client);
        Ok(())
    }

    pub async fn insert_package(&self, package: PackagePlan) {
        self.data.write().await.packages.push(package);
    }

    /// Record a ledger entry. Type, status and payment method must be known
    /// values, as the table's CHECK constraints require.
    pub async fn insert_transaction(&self, txn: ClientTransaction) -> Result<(), AppError> {
        if txn.transaction_type().is_none() {
            return Err(AppError::BadRequest(anyhow::anyhow!(
                "Unknown transaction type '{}'",
                txn.txn_type
            )));
        }
        if txn.transaction_status().is_none() {
            return Err(AppError::BadRequest(anyhow::anyhow!(
                "Unknown transaction status '{}'",
                txn.status
            )));
        }
        if let Err(raw) = txn.method() {
            return Err(AppError::BadRequest(anyhow::anyhow!(
                "Unknown payment method '{}'",
                raw
            )));
        }
        self.data.write().await.transactions.push(txn);
        Ok(())
    }

    pub async fn insert_session(&self, session: AccountingSession) {
        self.data.write().await.sessions.push(session);
    }

    /// Delete an account, as an admin would in the billing system.
    pub async fn remove_client(&self, client_id: i64) -> bool {
        let mut data = self.data.write().await;
        let before = data.clients.len();
        data.clients.retain(|c| c.id != client_id);
        data.clients.len() != before
    }

    pub async fn ticket_count(&self) -> usize {
        self.data.read().await.tickets.len()
    }

    pub async fn user_count(&self) -> usize {
        self.data.read().await.users.len()
    }
}

#[async_trait]
impl AccountStore for MemoryStore {
    async fn find_client_by_id(&self, client_id: i64) -> Result<Option<ClientAccount>, AppError> {
        let data = self.data.read().await;
        Ok(data.clients.iter().find(|c| c.id == client_id).cloned())
    }

    async fn find_client_by_username(
        &self,
        username: &str,
    ) -> Result<Option<ClientAccount>, AppError> {
        let data = self.data.read().await;
        Ok(data.clients.iter().find(|c| c.username == username).cloned())
    }

    async fn find_package_by_profile(
        &self,
        profile_name: &str,
    ) -> Result<Option<PackagePlan>, AppError> {
        let data = self.data.read().await;
        Ok(data
            .packages
            .iter()
            .filter(|p| p.profile_name == profile_name)
            .min_by_key(|p| p.id)
            .cloned())
    }

    async fn find_active_package_by_profile(
        &self,
        profile_name: &str,
    ) -> Result<Option<PackagePlan>, AppError> {
        let data = self.data.read().await;
        Ok(data
            .packages
            .iter()
            .filter(|p| p.is_active && p.profile_name == profile_name)
            .min_by_key(|p| p.id)
            .cloned())
    }

    async fn list_active_packages(&self) -> Result<Vec<PackagePlan>, AppError> {
        let data = self.data.read().await;
        let mut packages: Vec<PackagePlan> =
            data.packages.iter().filter(|p| p.is_active).cloned().collect();
        packages.sort_by(|a, b| a.price.cmp(&b.price).then_with(|| a.name.cmp(&b.name)));
        Ok(packages)
    }

    async fn toggle_auto_renew(&self, client_id: i64) -> Result<Option<bool>, AppError> {
        let mut data = self.data.write().await;
        Ok(data.client_mut(client_id).map(|client| {
            client.auto_renew = !client.auto_renew;
            client.updated_date = Some(Utc::now());
            client.auto_renew
        }))
    }

    async fn update_contact_details(
        &self,
        client_id: i64,
        details: &UpdateContactDetails,
    ) -> Result<Option<ClientAccount>, AppError> {
        let mut data = self.data.write().await;
        Ok(data.client_mut(client_id).map(|client| {
            client.name = details.name.clone();
            client.email = details.email.clone();
            if let Some(mobile) = &details.mobile_number {
                client.mobile_number = mobile.clone();
            }
            client.description = details.description.clone();
            client.address_line1 = details.address_line1.clone();
            client.address_line2 = details.address_line2.clone();
            client.city = details.city.clone();
            client.district = details.district.clone();
            client.upazila = details.upazila.clone();
            client.union_name = details.union_name.clone();
            client.zip = details.zip.clone();
            client.updated_date = Some(Utc::now());
            client.clone()
        }))
    }

    async fn set_next_package(
        &self,
        client_id: i64,
        profile_name: &str,
    ) -> Result<Option<ClientAccount>, AppError> {
        let mut data = self.data.write().await;
        Ok(data.client_mut(client_id).map(|client| {
            client.next_user_profile = Some(profile_name.to_string());
            client.updated_date = Some(Utc::now());
            client.clone()
        }))
    }
}

#[async_trait]
impl UsageStore for MemoryStore {
    async fn sum_octets_since(
        &self,
        username: &str,
        since: DateTime<Utc>,
    ) -> Result<u64, AppError> {
        let data = self.data.read().await;
        Ok(data
            .sessions
            .iter()
            .filter(|s| s.username == username)
            .filter(|s| s.acctstarttime.is_some_and(|start| start >= since))
            .fold(0u64, |acc, s| acc.saturating_add(s.total_octets())))
    }
}

#[async_trait]
impl HistoryStore for MemoryStore {
    async fn recent_payments(
        &self,
        username: &str,
        limit: i64,
    ) -> Result<Vec<ClientTransaction>, AppError> {
        let data = self.data.read().await;
        let mut rows: Vec<ClientTransaction> = data
            .transactions
            .iter()
            .filter(|t| t.client_username.as_deref() == Some(username))
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            b.transaction_date
                .cmp(&a.transaction_date)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(bounded(rows, limit))
    }

    async fn recent_sessions(
        &self,
        username: &str,
        limit: i64,
    ) -> Result<Vec<AccountingSession>, AppError> {
        let data = self.data.read().await;
        let mut rows: Vec<AccountingSession> = data
            .sessions
            .iter()
            .filter(|s| s.username == username)
            .cloned()
            .collect();
        // Sessions without a start time sort last, like NULLS LAST.
        rows.sort_by(|a, b| {
            b.acctstarttime
                .cmp(&a.acctstarttime)
                .then_with(|| b.radacctid.cmp(&a.radacctid))
        });
        Ok(bounded(rows, limit))
    }
}

#[async_trait]
impl TicketStore for MemoryStore {
    async fn insert_ticket(&self, ticket: &NewTicket) -> Result<Ticket, AppError> {
        let mut data = self.data.write().await;
        let now = Utc::now();
        let row = Ticket {
            id: next_id(data.tickets.iter().map(|t| t.id)),
            subject: ticket.subject.clone(),
            description: ticket.description.clone(),
            status: ticket.status.as_str().to_string(),
            priority: ticket.priority.as_str().to_string(),
            client_id: ticket.client_id,
            client_username: ticket.client_username.clone(),
            created_at: now,
            updated_at: now,
        };
        data.tickets.push(row.clone());
        Ok(row)
    }

    async fn recent_tickets(&self, client_id: i64, limit: i64) -> Result<Vec<Ticket>, AppError> {
        let data = self.data.read().await;
        let mut rows: Vec<Ticket> = data
            .tickets
            .iter()
            .filter(|t| t.client_id == client_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));
        Ok(bounded(rows, limit))
    }
}

#[async_trait]
impl PortalUserStore for MemoryStore {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<PortalUser>, AppError> {
        let data = self.data.read().await;
        Ok(data.users.iter().find(|u| u.email == email).cloned())
    }

    async fn create_user_with_profile(
        &self,
        user: &NewPortalUser,
    ) -> Result<PortalUser, AppError> {
        let mut data = self.data.write().await;
        if let Some(existing) = data.users.iter().find(|u| u.email == user.email) {
            return Ok(existing.clone());
        }

        let now = Utc::now();
        let row = PortalUser {
            id: next_id(data.users.iter().map(|u| u.id)),
            name: user.name.clone(),
            email: user.email.clone(),
            created_at: now,
        };
        let profile = PortalProfile {
            id: next_id(data.profiles.iter().map(|p| p.id)),
            user_id: row.id,
            bio: user.bio.clone(),
            fully_onboarded: true,
            created_at: now,
        };
        data.users.push(row.clone());
        data.profiles.push(profile);
        Ok(row)
    }

    async fn find_profile_by_user(
        &self,
        user_id: i64,
    ) -> Result<Option<PortalProfile>, AppError> {
        let data = self.data.read().await;
        Ok(data.profiles.iter().find(|p| p.user_id == user_id).cloned())
    }
}

#[async_trait]
impl StoreHealth for MemoryStore {
    async fn health_check(&self) -> Result<(), AppError> {
        Ok(())
    }
}
