use super::track;
use crate::dtos::{CreateTicketRequest, HistoryQuery};
use crate::models::Ticket;
use crate::session::CurrentClient;
use crate::startup::AppState;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use service_core::error::AppError;

/// GET /api/tickets?limit=
pub async fn list_tickets(
    State(state): State<AppState>,
    current: CurrentClient,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<Ticket>>, AppError> {
    let tickets = track(
        "list_tickets",
        state
            .tickets
            .list_tickets(current.claims.client_id, query.limit())
            .await,
    )?;
    Ok(Json(tickets))
}

/// POST /api/tickets
pub async fn create_ticket(
    State(state): State<AppState>,
    current: CurrentClient,
    Json(request): Json<CreateTicketRequest>,
) -> Result<(StatusCode, Json<Ticket>), AppError> {
    let ticket = track(
        "create_ticket",
        state
            .tickets
            .create_ticket(
                current.claims.client_id,
                &current.claims.client_username,
                &request.subject,
                &request.description,
            )
            .await,
    )?;
    Ok((StatusCode::CREATED, Json(ticket)))
}
