//! HTTP handlers for isp-portal-service.
//!
//! Handlers only translate between JSON and the portal components; page
//! rendering happens elsewhere.

pub mod auth;
pub mod health;
pub mod history;
pub mod packages;
pub mod profile;
pub mod tickets;

use crate::services::record_error;
use service_core::error::AppError;

/// Count failed operations by error kind before handing the error to axum.
pub(crate) fn track<T>(operation: &str, result: Result<T, AppError>) -> Result<T, AppError> {
    result.inspect_err(|e| record_error(e.kind(), operation))
}
