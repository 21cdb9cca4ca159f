//! Bounded, newest-first history reads.

use super::store::{HistoryStore, TicketStore};
use crate::models::{AccountingSession, ClientTransaction, Ticket};
use service_core::error::AppError;
use std::sync::Arc;
use tracing::instrument;

/// Payment, session and ticket history. No status filtering: pending, failed
/// and reversed payments and closed tickets are all returned.
#[derive(Clone)]
pub struct BillingHistoryReader {
    history: Arc<dyn HistoryStore>,
    tickets: Arc<dyn TicketStore>,
}

impl BillingHistoryReader {
    pub fn new(history: Arc<dyn HistoryStore>, tickets: Arc<dyn TicketStore>) -> Self {
        Self { history, tickets }
    }

    /// Most recent transactions first. A non-positive limit returns nothing.
    #[instrument(skip(self))]
    pub async fn payment_history(
        &self,
        username: &str,
        limit: i64,
    ) -> Result<Vec<ClientTransaction>, AppError> {
        if limit <= 0 {
            return Ok(Vec::new());
        }
        self.history.recent_payments(username, limit).await
    }

    #[instrument(skip(self))]
    pub async fn session_history(
        &self,
        username: &str,
        limit: i64,
    ) -> Result<Vec<AccountingSession>, AppError> {
        if limit <= 0 {
            return Ok(Vec::new());
        }
        self.history.recent_sessions(username, limit).await
    }

    #[instrument(skip(self))]
    pub async fn recent_tickets(&self, client_id: i64, limit: i64) -> Result<Vec<Ticket>, AppError> {
        if limit <= 0 {
            return Ok(Vec::new());
        }
        self.tickets.recent_tickets(client_id, limit).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::{session, transaction};
    use crate::services::MemoryStore;
    use chrono::{Duration, Utc};
    use proptest::prelude::*;

    fn reader(store: Arc<MemoryStore>) -> BillingHistoryReader {
        BillingHistoryReader::new(store.clone(), store)
    }

    #[tokio::test]
    async fn test_payments_include_every_status() {
        let store = Arc::new(MemoryStore::new());
        let now = Utc::now();
        for (i, status) in ["pending", "completed", "failed", "reversed"].iter().enumerate() {
            store
                .insert_transaction(transaction(i as i64 + 1, "rahim", now - Duration::hours(i as i64), status))
                .await
                .unwrap();
        }
        store
            .insert_transaction(transaction(9, "karim", now, "completed"))
            .await
            .unwrap();

        let payments = reader(store).payment_history("rahim", 10).await.unwrap();

        let statuses: Vec<&str> = payments.iter().map(|p| p.status.as_str()).collect();
        assert_eq!(statuses, vec!["pending", "completed", "failed", "reversed"]);
    }

    #[tokio::test]
    async fn test_non_positive_limit_returns_nothing() {
        let store = Arc::new(MemoryStore::new());
        store
            .insert_transaction(transaction(1, "rahim", Utc::now(), "completed"))
            .await
            .unwrap();
        let reader = reader(store);

        assert!(reader.payment_history("rahim", 0).await.unwrap().is_empty());
        assert!(reader.session_history("rahim", -1).await.unwrap().is_empty());
        assert!(reader.recent_tickets(1, 0).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_sessions_newest_first() {
        let store = Arc::new(MemoryStore::new());
        let now = Utc::now();
        store.insert_session(session(1, "rahim", Some(now - Duration::days(2)), None, None)).await;
        store.insert_session(session(2, "rahim", None, None, None)).await;
        store.insert_session(session(3, "rahim", Some(now), None, None)).await;

        let sessions = reader(store).session_history("rahim", 5).await.unwrap();
        let ids: Vec<i64> = sessions.iter().map(|s| s.radacctid).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    proptest! {
        #[test]
        fn prop_payment_history_is_bounded_and_sorted(
            ages in proptest::collection::vec(0i64..1_000_000, 0..30),
            limit in 1i64..15,
        ) {
            let now = Utc::now();
            let store = Arc::new(MemoryStore::new());
            let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();

            let payments = runtime.block_on(async {
                for (i, age) in ages.iter().enumerate() {
                    store
                        .insert_transaction(transaction(i as i64 + 1, "rahim", now - Duration::seconds(*age), "completed"))
                        .await
                        .unwrap();
                }
                reader(store.clone()).payment_history("rahim", limit).await.unwrap()
            });

            prop_assert!(payments.len() as i64 <= limit);
            prop_assert_eq!(payments.len(), ages.len().min(limit as usize));
            for pair in payments.windows(2) {
                prop_assert!(pair[0].transaction_date >= pair[1].transaction_date);
            }
        }
    }
}
