use super::track;
use crate::dtos::HistoryQuery;
use crate::models::{AccountingSession, ClientTransaction};
use crate::session::CurrentClient;
use crate::startup::AppState;
use axum::{
    extract::{Query, State},
    Json,
};
use service_core::error::AppError;

/// GET /api/payments?limit=
pub async fn list_payments(
    State(state): State<AppState>,
    current: CurrentClient,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<ClientTransaction>>, AppError> {
    let payments = track(
        "list_payments",
        state
            .history
            .payment_history(&current.claims.client_username, query.limit())
            .await,
    )?;
    Ok(Json(payments))
}

/// GET /api/sessions?limit=
pub async fn list_sessions(
    State(state): State<AppState>,
    current: CurrentClient,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<AccountingSession>>, AppError> {
    let sessions = track(
        "list_sessions",
        state
            .history
            .session_history(&current.claims.client_username, query.limit())
            .await,
    )?;
    Ok(Json(sessions))
}
