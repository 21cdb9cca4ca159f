//! Typed session claims for the authenticated subscriber.

use axum::{extract::FromRequestParts, http::request::Parts};
use serde::{Deserialize, Serialize};
use service_core::error::AppError;
use tower_sessions::Session;

/// Key under which [`SessionClaims`] are stored in the session.
pub const SESSION_CLAIMS_KEY: &str = "portal.claims";

/// Links the generic portal user to the subscriber account for this session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    pub user_id: i64,
    pub client_id: i64,
    pub client_username: String,
}

impl SessionClaims {
    pub fn is_valid(&self) -> bool {
        self.user_id > 0 && self.client_id > 0 && !self.client_username.trim().is_empty()
    }
}

fn unauthenticated() -> AppError {
    AppError::Unauthorized(anyhow::anyhow!("no authenticated client"))
}

fn session_error(e: tower_sessions::session::Error) -> AppError {
    AppError::InternalError(anyhow::anyhow!("Session store error: {}", e))
}

/// Store claims after a successful login, rotating the session id first.
pub async fn store_claims(session: &Session, claims: &SessionClaims) -> Result<(), AppError> {
    session.cycle_id().await.map_err(session_error)?;
    session
        .insert(SESSION_CLAIMS_KEY, claims)
        .await
        .map_err(session_error)
}

pub async fn clear_session(session: &Session) -> Result<(), AppError> {
    session.flush().await.map_err(session_error)
}

/// Extractor for routes that need a logged-in subscriber.
///
/// Missing, unreadable or invalid claims reject with `Unauthorized`.
pub struct CurrentClient {
    pub claims: SessionClaims,
    pub session: Session,
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for CurrentClient
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(|(_, message)| AppError::InternalError(anyhow::anyhow!(message)))?;

        let claims = match session.get::<SessionClaims>(SESSION_CLAIMS_KEY).await {
            Ok(Some(claims)) if claims.is_valid() => claims,
            Ok(_) => return Err(unauthenticated()),
            Err(e) => {
                tracing::warn!(error = %e, "Discarding unreadable session claims");
                return Err(unauthenticated());
            }
        };

        Ok(Self { claims, session })
    }
}
