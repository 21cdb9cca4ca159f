//! Generic portal user, linked to subscriber accounts by email.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PortalUser {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a portal user together with its profile.
#[derive(Debug, Clone)]
pub struct NewPortalUser {
    pub name: String,
    pub email: String,
    pub bio: String,
}

/// Profile row created alongside a portal user.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PortalProfile {
    pub id: i64,
    pub user_id: i64,
    pub bio: String,
    pub fully_onboarded: bool,
    pub created_at: DateTime<Utc>,
}
