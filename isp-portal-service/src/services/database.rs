//! PostgreSQL store for isp-portal-service.

use super::store::{
    AccountStore, HistoryStore, PortalUserStore, StoreHealth, TicketStore, UsageStore,
};
use crate::models::{
    AccountingSession, ClientAccount, ClientTransaction, NewPortalUser, NewTicket, PackagePlan,
    PortalProfile, PortalUser, Ticket, UpdateContactDetails,
};
use crate::services::metrics::DB_QUERY_DURATION;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use service_core::error::AppError;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::{info, instrument};

const CLIENT_COLUMNS: &str = "id, name, username, password_hash, mobile_number, email, description, \
     balance, address_line1, address_line2, city, district, upazila, union_name, zip, status, \
     payment_date, payment_type, auto_renew, user_profile, next_user_profile, created_date, \
     updated_date";

const PACKAGE_COLUMNS: &str =
    "id, name, pool_name, profile_name, price, currency, is_active, created_date";

const TICKET_COLUMNS: &str = "id, subject, description, status, priority, client_id, \
     client_username, created_at, updated_at";

/// Database connection pool wrapper.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

fn db_error(context: &str, e: sqlx::Error) -> AppError {
    AppError::DatabaseError(anyhow::anyhow!("{}: {}", context, e))
}

impl Database {
    /// Create a new database connection pool.
    #[instrument(skip(database_url), fields(service = "isp-portal-service"))]
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self, AppError> {
        info!(
            max_connections = max_connections,
            min_connections = min_connections,
            "Connecting to PostgreSQL"
        );

        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(600))
            .connect(database_url)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to connect: {}", e)))?;

        info!("PostgreSQL connection pool established");

        Ok(Self { pool })
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Run database migrations.
    #[instrument(skip(self))]
    pub async fn run_migrations(&self) -> Result<(), AppError> {
        info!("Running database migrations");
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Migration failed: {}", e)))?;
        info!("Database migrations completed");
        Ok(())
    }
}

#[async_trait]
impl StoreHealth for Database {
    #[instrument(skip(self))]
    async fn health_check(&self) -> Result<(), AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["health_check"])
            .start_timer();

        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Health check failed", e))?;

        timer.observe_duration();
        Ok(())
    }
}

// =========================================================================
// Accounts and packages
// =========================================================================

#[async_trait]
impl AccountStore for Database {
    #[instrument(skip(self))]
    async fn find_client_by_id(&self, client_id: i64) -> Result<Option<ClientAccount>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["find_client_by_id"])
            .start_timer();

        let client = sqlx::query_as::<_, ClientAccount>(&format!(
            "SELECT {} FROM clients WHERE id = $1",
            CLIENT_COLUMNS
        ))
        .bind(client_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to load client", e))?;

        timer.observe_duration();
        Ok(client)
    }

    #[instrument(skip(self))]
    async fn find_client_by_username(
        &self,
        username: &str,
    ) -> Result<Option<ClientAccount>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["find_client_by_username"])
            .start_timer();

        let client = sqlx::query_as::<_, ClientAccount>(&format!(
            "SELECT {} FROM clients WHERE username = $1",
            CLIENT_COLUMNS
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to load client", e))?;

        timer.observe_duration();
        Ok(client)
    }

    #[instrument(skip(self))]
    async fn find_package_by_profile(
        &self,
        profile_name: &str,
    ) -> Result<Option<PackagePlan>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["find_package_by_profile"])
            .start_timer();

        let package = sqlx::query_as::<_, PackagePlan>(&format!(
            "SELECT {} FROM packages WHERE profile_name = $1 ORDER BY id ASC LIMIT 1",
            PACKAGE_COLUMNS
        ))
        .bind(profile_name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to load package", e))?;

        timer.observe_duration();
        Ok(package)
    }

    #[instrument(skip(self))]
    async fn find_active_package_by_profile(
        &self,
        profile_name: &str,
    ) -> Result<Option<PackagePlan>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["find_active_package_by_profile"])
            .start_timer();

        let package = sqlx::query_as::<_, PackagePlan>(&format!(
            "SELECT {} FROM packages WHERE profile_name = $1 AND is_active = TRUE ORDER BY id ASC LIMIT 1",
            PACKAGE_COLUMNS
        ))
        .bind(profile_name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to load package", e))?;

        timer.observe_duration();
        Ok(package)
    }

    #[instrument(skip(self))]
    async fn list_active_packages(&self) -> Result<Vec<PackagePlan>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_active_packages"])
            .start_timer();

        let packages = sqlx::query_as::<_, PackagePlan>(&format!(
            "SELECT {} FROM packages WHERE is_active = TRUE ORDER BY price ASC, name ASC",
            PACKAGE_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to list packages", e))?;

        timer.observe_duration();
        Ok(packages)
    }

    #[instrument(skip(self))]
    async fn toggle_auto_renew(&self, client_id: i64) -> Result<Option<bool>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["toggle_auto_renew"])
            .start_timer();

        let auto_renew = sqlx::query_scalar::<_, bool>(
            r#"
            UPDATE clients
            SET auto_renew = NOT auto_renew, updated_date = NOW()
            WHERE id = $1
            RETURNING auto_renew
            "#,
        )
        .bind(client_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to toggle auto-renew", e))?;

        timer.observe_duration();
        Ok(auto_renew)
    }

    #[instrument(skip(self, details))]
    async fn update_contact_details(
        &self,
        client_id: i64,
        details: &UpdateContactDetails,
    ) -> Result<Option<ClientAccount>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["update_contact_details"])
            .start_timer();

        let client = sqlx::query_as::<_, ClientAccount>(&format!(
            r#"
            UPDATE clients
            SET name = $2,
                email = $3,
                mobile_number = COALESCE($4, mobile_number),
                description = $5,
                address_line1 = $6,
                address_line2 = $7,
                city = $8,
                district = $9,
                upazila = $10,
                union_name = $11,
                zip = $12,
                updated_date = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            CLIENT_COLUMNS
        ))
        .bind(client_id)
        .bind(&details.name)
        .bind(&details.email)
        .bind(&details.mobile_number)
        .bind(&details.description)
        .bind(&details.address_line1)
        .bind(&details.address_line2)
        .bind(&details.city)
        .bind(&details.district)
        .bind(&details.upazila)
        .bind(&details.union_name)
        .bind(&details.zip)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to update contact details", e))?;

        timer.observe_duration();
        Ok(client)
    }

    #[instrument(skip(self))]
    async fn set_next_package(
        &self,
        client_id: i64,
        profile_name: &str,
    ) -> Result<Option<ClientAccount>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["set_next_package"])
            .start_timer();

        let client = sqlx::query_as::<_, ClientAccount>(&format!(
            r#"
            UPDATE clients
            SET next_user_profile = $2, updated_date = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            CLIENT_COLUMNS
        ))
        .bind(client_id)
        .bind(profile_name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to set next package", e))?;

        timer.observe_duration();
        Ok(client)
    }
}

// =========================================================================
// Usage and history
// =========================================================================

#[async_trait]
impl UsageStore for Database {
    #[instrument(skip(self))]
    async fn sum_octets_since(
        &self,
        username: &str,
        since: DateTime<Utc>,
    ) -> Result<u64, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["sum_octets_since"])
            .start_timer();

        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COALESCE(SUM(
                GREATEST(COALESCE(acctinputoctets, 0), 0)
                + GREATEST(COALESCE(acctoutputoctets, 0), 0)
            ), 0)::BIGINT
            FROM radacct
            WHERE username = $1 AND acctstarttime >= $2
            "#,
        )
        .bind(username)
        .bind(since)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("Failed to sum usage", e))?;

        timer.observe_duration();
        Ok(u64::try_from(total).unwrap_or(0))
    }
}

#[async_trait]
impl HistoryStore for Database {
    #[instrument(skip(self))]
    async fn recent_payments(
        &self,
        username: &str,
        limit: i64,
    ) -> Result<Vec<ClientTransaction>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["recent_payments"])
            .start_timer();

        let rows = sqlx::query_as::<_, ClientTransaction>(
            r#"
            SELECT id, transaction_ref, amount, txn_type, status, total_balance, payment_method,
                   client_username, description, transaction_date, created_by
            FROM client_txn
            WHERE client_username = $1
            ORDER BY transaction_date DESC, id DESC
            LIMIT $2
            "#,
        )
        .bind(username)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to load payment history", e))?;

        timer.observe_duration();
        Ok(rows)
    }

    #[instrument(skip(self))]
    async fn recent_sessions(
        &self,
        username: &str,
        limit: i64,
    ) -> Result<Vec<AccountingSession>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["recent_sessions"])
            .start_timer();

        let rows = sqlx::query_as::<_, AccountingSession>(
            r#"
            SELECT radacctid, acctsessionid, acctuniqueid, username, acctstarttime, acctstoptime,
                   acctsessiontime, acctinputoctets, acctoutputoctets, framedipaddress,
                   acctterminatecause
            FROM radacct
            WHERE username = $1
            ORDER BY acctstarttime DESC NULLS LAST, radacctid DESC
            LIMIT $2
            "#,
        )
        .bind(username)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to load session history", e))?;

        timer.observe_duration();
        Ok(rows)
    }
}

// =========================================================================
// Tickets
// =========================================================================

#[async_trait]
impl TicketStore for Database {
    #[instrument(skip(self, ticket), fields(client_id = ticket.client_id))]
    async fn insert_ticket(&self, ticket: &NewTicket) -> Result<Ticket, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["insert_ticket"])
            .start_timer();

        let row = sqlx::query_as::<_, Ticket>(&format!(
            r#"
            INSERT INTO tickets (subject, description, status, priority, client_id, client_username)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            TICKET_COLUMNS
        ))
        .bind(&ticket.subject)
        .bind(&ticket.description)
        .bind(ticket.status.as_str())
        .bind(ticket.priority.as_str())
        .bind(ticket.client_id)
        .bind(&ticket.client_username)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("Failed to create ticket", e))?;

        timer.observe_duration();
        Ok(row)
    }

    #[instrument(skip(self))]
    async fn recent_tickets(&self, client_id: i64, limit: i64) -> Result<Vec<Ticket>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["recent_tickets"])
            .start_timer();

        let rows = sqlx::query_as::<_, Ticket>(&format!(
            r#"
            SELECT {}
            FROM tickets
            WHERE client_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT $2
            "#,
            TICKET_COLUMNS
        ))
        .bind(client_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to load tickets", e))?;

        timer.observe_duration();
        Ok(rows)
    }
}

// =========================================================================
// Portal users
// =========================================================================

#[async_trait]
impl PortalUserStore for Database {
    #[instrument(skip(self))]
    async fn find_user_by_email(&self, email: &str) -> Result<Option<PortalUser>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["find_user_by_email"])
            .start_timer();

        let user = sqlx::query_as::<_, PortalUser>(
            "SELECT id, name, email, created_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to load user", e))?;

        timer.observe_duration();
        Ok(user)
    }

    #[instrument(skip(self, user), fields(email = %user.email))]
    async fn create_user_with_profile(
        &self,
        user: &NewPortalUser,
    ) -> Result<PortalUser, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["create_user_with_profile"])
            .start_timer();

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("Failed to begin transaction", e))?;

        // A concurrent login may have created the user already; keep that row.
        let row = sqlx::query_as::<_, PortalUser>(
            r#"
            INSERT INTO users (name, email)
            VALUES ($1, $2)
            ON CONFLICT (email) DO UPDATE SET email = EXCLUDED.email
            RETURNING id, name, email, created_at
            "#,
        )
        .bind(&user.name)
        .bind(&user.email)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| db_error("Failed to create user", e))?;

        sqlx::query(
            r#"
            INSERT INTO profiles (user_id, bio, fully_onboarded)
            VALUES ($1, $2, TRUE)
            ON CONFLICT (user_id) DO NOTHING
            "#,
        )
        .bind(row.id)
        .bind(&user.bio)
        .execute(&mut *tx)
        .await
        .map_err(|e| db_error("Failed to create profile", e))?;

        tx.commit()
            .await
            .map_err(|e| db_error("Failed to commit transaction", e))?;

        timer.observe_duration();
        Ok(row)
    }

    #[instrument(skip(self))]
    async fn find_profile_by_user(
        &self,
        user_id: i64,
    ) -> Result<Option<PortalProfile>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["find_profile_by_user"])
            .start_timer();

        let profile = sqlx::query_as::<_, PortalProfile>(
            "SELECT id, user_id, bio, fully_onboarded, created_at FROM profiles WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to load profile", e))?;

        timer.observe_duration();
        Ok(profile)
    }
}
