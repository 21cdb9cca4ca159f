//! Dashboard assembly: one read model per subscriber.

use super::history::BillingHistoryReader;
use super::metrics::{record_degraded_read, record_profile_view};
use super::store::AccountStore;
use super::subscription::resolve_status;
use super::usage::UsageAggregator;
use crate::models::{DashboardSection, IspProfileView};
use chrono::{DateTime, Local, TimeZone};
use rust_decimal::Decimal;
use service_core::error::AppError;
use std::sync::Arc;
use tracing::{instrument, warn};

pub const PAYMENT_HISTORY_LIMIT: i64 = 10;
pub const SESSION_HISTORY_LIMIT: i64 = 5;
pub const TICKET_HISTORY_LIMIT: i64 = 5;

/// Best-effort read for a dashboard section: on failure, log, count and
/// substitute an empty list.
fn degraded_read<T>(
    section: DashboardSection,
    result: Result<Vec<T>, AppError>,
    degraded: &mut Vec<DashboardSection>,
) -> Vec<T> {
    match result {
        Ok(rows) => rows,
        Err(e) => {
            warn!(section = section.as_str(), error = %e, "Dashboard section degraded");
            record_degraded_read(section.as_str());
            degraded.push(section);
            Vec::new()
        }
    }
}

#[derive(Clone)]
pub struct ProfileAggregator {
    accounts: Arc<dyn AccountStore>,
    usage: UsageAggregator,
    history: BillingHistoryReader,
}

impl ProfileAggregator {
    pub fn new(
        accounts: Arc<dyn AccountStore>,
        usage: UsageAggregator,
        history: BillingHistoryReader,
    ) -> Self {
        Self {
            accounts,
            usage,
            history,
        }
    }

    /// Build the view using the process-local clock and time zone.
    pub async fn build_profile_view(&self, client_id: i64) -> Result<IspProfileView, AppError> {
        self.build_profile_view_at(client_id, &Local::now()).await
    }

    /// Account and package reads propagate their errors. Usage and history
    /// reads degrade to empty data and are listed in `degraded_sections`.
    /// The reads are not wrapped in one transaction.
    #[instrument(skip(self, now))]
    pub async fn build_profile_view_at<Tz: TimeZone>(
        &self,
        client_id: i64,
        now: &DateTime<Tz>,
    ) -> Result<IspProfileView, AppError> {
        let client = self
            .accounts
            .find_client_by_id(client_id)
            .await?
            .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Client {} not found", client_id)))?;

        let current_package = match client.current_profile() {
            Some(profile) => self.accounts.find_package_by_profile(profile).await?,
            None => None,
        };

        let package_status = resolve_status(&client, now);

        let mut degraded = Vec::new();

        let usage = self.usage.compute_usage(&client.username, now).await;
        if usage.is_degraded() {
            record_degraded_read(DashboardSection::Usage.as_str());
            degraded.push(DashboardSection::Usage);
        }

        let payments = degraded_read(
            DashboardSection::Payments,
            self.history
                .payment_history(&client.username, PAYMENT_HISTORY_LIMIT)
                .await,
            &mut degraded,
        );
        let sessions = degraded_read(
            DashboardSection::Sessions,
            self.history
                .session_history(&client.username, SESSION_HISTORY_LIMIT)
                .await,
            &mut degraded,
        );
        let tickets = degraded_read(
            DashboardSection::Tickets,
            self.history
                .recent_tickets(client.id, TICKET_HISTORY_LIMIT)
                .await,
            &mut degraded,
        );

        record_profile_view();

        Ok(IspProfileView {
            next_package_profile: client.next_user_profile.clone(),
            balance: client.balance,
            available_balance: client.balance.max(Decimal::ZERO),
            valid_until: client.payment_date,
            auto_renew: client.auto_renew,
            package_status,
            current_package,
            usage: usage.stats,
            payments,
            sessions,
            tickets,
            degraded_sections: degraded,
            client,
        })
    }
}
