use super::track;
use crate::dtos::LoginResponse;
use crate::services::LoginCredentials;
use crate::session::{clear_session, store_claims};
use crate::startup::AppState;
use axum::{extract::State, http::StatusCode, Json};
use service_core::error::AppError;
use tower_sessions::Session;

/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(credentials): Json<LoginCredentials>,
) -> Result<Json<LoginResponse>, AppError> {
    let claims = track("login", state.login.login(credentials).await)?;
    track("login", store_claims(&session, &claims).await)?;

    Ok(Json(LoginResponse {
        client_id: claims.client_id,
        client_username: claims.client_username,
    }))
}

/// POST /auth/logout
pub async fn logout(session: Session) -> Result<StatusCode, AppError> {
    track("logout", clear_session(&session).await)?;
    Ok(StatusCode::NO_CONTENT)
}
