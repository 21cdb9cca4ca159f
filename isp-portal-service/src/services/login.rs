//! Subscriber login: verify account credentials and link a portal user.

use super::metrics::record_login_attempt;
use super::password::{verify_password, Password};
use super::store::{AccountStore, PortalUserStore};
use crate::models::{AccountStatus, ClientAccount, NewPortalUser, PortalUser};
use crate::session::SessionClaims;
use serde::Deserialize;
use service_core::error::AppError;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use validator::Validate;

#[derive(Clone, Deserialize, Validate)]
pub struct LoginCredentials {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

fn invalid_credentials() -> AppError {
    AppError::Unauthorized(anyhow::anyhow!("Invalid username or password"))
}

#[derive(Clone)]
pub struct AccountLoginLink {
    accounts: Arc<dyn AccountStore>,
    users: Arc<dyn PortalUserStore>,
}

impl AccountLoginLink {
    pub fn new(accounts: Arc<dyn AccountStore>, users: Arc<dyn PortalUserStore>) -> Self {
        Self { accounts, users }
    }

    /// Check credentials against the subscriber account and return the claims
    /// to store in the session. The caller rotates the session id.
    #[instrument(skip(self, credentials), fields(username = %credentials.username.trim()))]
    pub async fn login(&self, credentials: LoginCredentials) -> Result<SessionClaims, AppError> {
        let credentials = LoginCredentials {
            username: credentials.username.trim().to_string(),
            password: credentials.password.trim().to_string(),
        };
        if let Err(e) = credentials.validate() {
            record_login_attempt("invalid_input");
            return Err(e.into());
        }

        let Some(client) = self
            .accounts
            .find_client_by_username(&credentials.username)
            .await?
        else {
            record_login_attempt("invalid_credentials");
            return Err(invalid_credentials());
        };

        let password = Password::new(credentials.password);
        if let Err(e) = verify_password(&password, &client.password_hash) {
            warn!(client_id = client.id, error = %e, "Client password rejected");
            record_login_attempt("invalid_credentials");
            return Err(invalid_credentials());
        }

        if client.account_status() != AccountStatus::Active {
            record_login_attempt("inactive");
            return Err(AppError::Forbidden(anyhow::anyhow!(
                "Your account is not active. Please contact support."
            )));
        }

        let user = self.link_portal_user(&client).await?;
        record_login_attempt("success");
        info!(client_id = client.id, user_id = user.id, "Client logged in");

        Ok(SessionClaims {
            user_id: user.id,
            client_id: client.id,
            client_username: client.username,
        })
    }

    /// Reuse the portal user with the client's email, or create one with a
    /// linked profile.
    async fn link_portal_user(&self, client: &ClientAccount) -> Result<PortalUser, AppError> {
        let email = client.email.trim().to_lowercase();
        if let Some(user) = self.users.find_user_by_email(&email).await? {
            return Ok(user);
        }

        let user = self
            .users
            .create_user_with_profile(&NewPortalUser {
                name: client.name.clone(),
                email,
                bio: format!("PPPoE Client - {}", client.username),
            })
            .await?;

        info!(user_id = user.id, client_id = client.id, "Portal user created for client");
        Ok(user)
    }
}
