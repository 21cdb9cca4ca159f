use super::track;
use crate::dtos::{AutoRenewResponse, NextPackageRequest};
use crate::models::{ClientAccount, IspProfileView, UpdateContactDetails};
use crate::session::{clear_session, CurrentClient};
use crate::startup::AppState;
use axum::{extract::State, Json};
use service_core::error::AppError;

/// GET /api/profile
///
/// An account that disappeared behind a live session logs the session out.
pub async fn get_profile(
    State(state): State<AppState>,
    current: CurrentClient,
) -> Result<Json<IspProfileView>, AppError> {
    match state.profiles.build_profile_view(current.claims.client_id).await {
        Ok(view) => Ok(Json(view)),
        Err(e) if e.is_not_found() => {
            tracing::warn!(
                client_id = current.claims.client_id,
                "Session refers to a missing client, clearing session"
            );
            clear_session(&current.session).await?;
            Err(AppError::Unauthorized(anyhow::anyhow!(
                "no authenticated client"
            )))
        }
        Err(e) => track("get_profile", Err(e)),
    }
}

/// PATCH /api/profile
pub async fn update_profile(
    State(state): State<AppState>,
    current: CurrentClient,
    Json(details): Json<UpdateContactDetails>,
) -> Result<Json<ClientAccount>, AppError> {
    let client = track(
        "update_profile",
        state
            .accounts
            .update_contact_details(current.claims.client_id, details)
            .await,
    )?;
    Ok(Json(client))
}

/// POST /api/profile/auto-renew
pub async fn toggle_auto_renew(
    State(state): State<AppState>,
    current: CurrentClient,
) -> Result<Json<AutoRenewResponse>, AppError> {
    let auto_renew = track(
        "toggle_auto_renew",
        state.accounts.toggle_auto_renew(current.claims.client_id).await,
    )?;
    Ok(Json(AutoRenewResponse { auto_renew }))
}

/// PUT /api/profile/next-package
pub async fn select_next_package(
    State(state): State<AppState>,
    current: CurrentClient,
    Json(request): Json<NextPackageRequest>,
) -> Result<Json<ClientAccount>, AppError> {
    let client = track(
        "select_next_package",
        state
            .accounts
            .select_next_package(current.claims.client_id, &request.profile_name)
            .await,
    )?;
    Ok(Json(client))
}
