use super::track;
use crate::models::PackagePlan;
use crate::startup::AppState;
use axum::{extract::State, Json};
use service_core::error::AppError;

/// GET /api/packages
pub async fn list_packages(State(state): State<AppState>) -> Result<Json<Vec<PackagePlan>>, AppError> {
    let packages = track("list_packages", state.accounts.list_packages().await)?;
    Ok(Json(packages))
}
