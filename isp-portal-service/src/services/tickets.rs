//! Support ticket intake.

use super::metrics::record_ticket_created;
use super::store::TicketStore;
use crate::models::{NewTicket, Ticket, TicketPriority, TicketStatus};
use service_core::error::AppError;
use std::sync::Arc;
use tracing::{info, instrument};
use validator::Validate;

#[derive(Clone)]
pub struct TicketIntake {
    store: Arc<dyn TicketStore>,
}

impl TicketIntake {
    pub fn new(store: Arc<dyn TicketStore>) -> Self {
        Self { store }
    }

    /// Open a ticket as `open` / `medium`.
    ///
    /// Blank subject or description fails with field-level validation errors
    /// and nothing is written.
    #[instrument(skip(self, subject, description))]
    pub async fn create_ticket(
        &self,
        client_id: i64,
        client_username: &str,
        subject: &str,
        description: &str,
    ) -> Result<Ticket, AppError> {
        let ticket = NewTicket {
            client_id,
            client_username: client_username.to_string(),
            subject: subject.trim().to_string(),
            description: description.trim().to_string(),
            status: TicketStatus::Open,
            priority: TicketPriority::Medium,
        };
        ticket.validate()?;

        let created = self.store.insert_ticket(&ticket).await?;
        record_ticket_created();
        info!(ticket_id = created.id, client_id, "Support ticket created");

        Ok(created)
    }

    /// Tickets for a client, newest first. A non-positive limit returns nothing.
    pub async fn list_tickets(&self, client_id: i64, limit: i64) -> Result<Vec<Ticket>, AppError> {
        if limit <= 0 {
            return Ok(Vec::new());
        }
        self.store.recent_tickets(client_id, limit).await
    }
}
