//! Subscriber self-service: auto-renew, contact details, next package.

use super::store::AccountStore;
use crate::models::{ClientAccount, PackagePlan, UpdateContactDetails};
use service_core::error::AppError;
use std::sync::Arc;
use tracing::{info, instrument};
use validator::Validate;

fn client_not_found(client_id: i64) -> AppError {
    AppError::NotFound(anyhow::anyhow!("Client {} not found", client_id))
}

#[derive(Clone)]
pub struct AccountService {
    accounts: Arc<dyn AccountStore>,
}

impl AccountService {
    pub fn new(accounts: Arc<dyn AccountStore>) -> Self {
        Self { accounts }
    }

    /// Flip auto-renew in one row update and return the new value.
    #[instrument(skip(self))]
    pub async fn toggle_auto_renew(&self, client_id: i64) -> Result<bool, AppError> {
        let auto_renew = self
            .accounts
            .toggle_auto_renew(client_id)
            .await?
            .ok_or_else(|| client_not_found(client_id))?;

        info!(client_id, auto_renew, "Auto-renew toggled");
        Ok(auto_renew)
    }

    /// Validate and store contact details. Nothing is written when
    /// validation fails.
    #[instrument(skip(self, details))]
    pub async fn update_contact_details(
        &self,
        client_id: i64,
        details: UpdateContactDetails,
    ) -> Result<ClientAccount, AppError> {
        let details = details.normalized();
        details.validate()?;

        let client = self
            .accounts
            .update_contact_details(client_id, &details)
            .await?
            .ok_or_else(|| client_not_found(client_id))?;

        info!(client_id, "Contact details updated");
        Ok(client)
    }

    /// Queue an active package for the next renewal. Payment and the renewal
    /// itself happen in the billing system.
    #[instrument(skip(self))]
    pub async fn select_next_package(
        &self,
        client_id: i64,
        profile_name: &str,
    ) -> Result<ClientAccount, AppError> {
        let profile_name = profile_name.trim();
        if profile_name.is_empty() {
            return Err(AppError::BadRequest(anyhow::anyhow!(
                "Package profile is required"
            )));
        }

        let package = match self
            .accounts
            .find_active_package_by_profile(profile_name)
            .await?
        {
            Some(package) => package,
            None => {
                return Err(match self.accounts.find_package_by_profile(profile_name).await? {
                    Some(retired) => AppError::BadRequest(anyhow::anyhow!(
                        "Package '{}' is not available",
                        retired.name
                    )),
                    None => {
                        AppError::NotFound(anyhow::anyhow!("Package '{}' not found", profile_name))
                    }
                });
            }
        };

        let client = self
            .accounts
            .set_next_package(client_id, &package.profile_name)
            .await?
            .ok_or_else(|| client_not_found(client_id))?;

        info!(client_id, next_profile = %package.profile_name, "Next package selected");
        Ok(client)
    }

    /// Active packages, cheapest first.
    pub async fn list_packages(&self) -> Result<Vec<PackagePlan>, AppError> {
        self.accounts.list_active_packages().await
    }
}
