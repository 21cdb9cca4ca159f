//! Test helper module for isp-portal-service integration tests.
//!
//! Builds the router over a seeded in-memory store and drives it in-process,
//! carrying the session cookie between requests like a browser would.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use chrono::{Duration, TimeZone, Utc};
use isp_portal_service::config::PortalConfig;
use isp_portal_service::models::{
    AccountingSession, ClientAccount, ClientTransaction, PackagePlan,
};
use isp_portal_service::services::password::{hash_password, Password};
use isp_portal_service::services::{init_metrics, MemoryStore};
use isp_portal_service::startup::{build_router, AppState};
use rust_decimal::Decimal;
use serde_json::Value;
use service_core::config::Config as CoreConfig;
use std::sync::Arc;
use tower::ServiceExt;

pub const ACTIVE_CLIENT_ID: i64 = 7;
pub const ACTIVE_USERNAME: &str = "rahim";
pub const INACTIVE_USERNAME: &str = "karim";
pub const PASSWORD: &str = "pppoe-s3cret";

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    cookie: Option<String>,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Value,
}

fn test_config() -> PortalConfig {
    PortalConfig::from_vars(CoreConfig::default(), |key| match key {
        "PORTAL_STORAGE" => Some("memory".to_string()),
        "PORTAL_SERVICE_NAME" => Some("isp-portal-service-test".to_string()),
        _ => None,
    })
    .expect("Failed to build test configuration")
}

pub fn client(id: i64, username: &str, status: &str) -> ClientAccount {
    ClientAccount {
        id,
        name: format!("Client {}", username),
        username: username.to_string(),
        password_hash: hash_password(&Password::new(PASSWORD.to_string()))
            .expect("Failed to hash password"),
        mobile_number: "01711000000".to_string(),
        email: format!("{}@example.com", username),
        description: None,
        balance: Decimal::new(500, 0),
        address_line1: Some("House 12, Road 4".to_string()),
        address_line2: None,
        city: Some("Dhaka".to_string()),
        district: Some("Dhaka".to_string()),
        upazila: None,
        union_name: None,
        zip: Some("1207".to_string()),
        status: status.to_string(),
        payment_date: Some(Utc.with_ymd_and_hms(2099, 1, 1, 0, 0, 0).unwrap()),
        payment_type: Some("prepaid".to_string()),
        auto_renew: true,
        user_profile: Some("home-10m".to_string()),
        next_user_profile: None,
        created_date: Utc::now(),
        updated_date: None,
    }
}

pub fn package(id: i64, name: &str, profile_name: &str, price: i64, is_active: bool) -> PackagePlan {
    PackagePlan {
        id,
        name: name.to_string(),
        pool_name: Some("pool-residential".to_string()),
        profile_name: profile_name.to_string(),
        price: Decimal::new(price, 0),
        currency: "BDT".to_string(),
        is_active,
        created_date: Utc::now(),
    }
}

pub fn payment(id: i64, username: &str, hours_ago: i64, status: &str) -> ClientTransaction {
    ClientTransaction {
        id,
        transaction_ref: format!("TXN-{:06}", id),
        amount: Decimal::new(500, 0),
        txn_type: "RENEWAL".to_string(),
        status: status.to_string(),
        total_balance: Decimal::new(500, 0),
        payment_method: Some("gateway_bkash".to_string()),
        client_username: Some(username.to_string()),
        description: None,
        transaction_date: Utc::now() - Duration::hours(hours_ago),
        created_by: "billing".to_string(),
    }
}

pub fn session(id: i64, username: &str, input: i64, output: i64) -> AccountingSession {
    AccountingSession {
        radacctid: id,
        acctsessionid: format!("8100{:04}", id),
        acctuniqueid: format!("u{}", id),
        username: username.to_string(),
        acctstarttime: Some(Utc::now()),
        acctstoptime: None,
        acctsessiontime: Some(60),
        acctinputoctets: Some(input),
        acctoutputoctets: Some(output),
        framedipaddress: "10.20.0.15".to_string(),
        acctterminatecause: String::new(),
    }
}

impl TestApp {
    /// Router over a store holding one active and one inactive client, a
    /// small package catalog, a dozen payments and one session today.
    pub async fn spawn() -> Self {
        init_metrics();

        let store = Arc::new(MemoryStore::new());
        store
            .insert_client(client(ACTIVE_CLIENT_ID, ACTIVE_USERNAME, "active"))
            .await
            .expect("Failed to seed active client");
        store
            .insert_client(client(8, INACTIVE_USERNAME, "inactive"))
            .await
            .expect("Failed to seed inactive client");

        store.insert_package(package(1, "Home 10 Mbps", "home-10m", 500, true)).await;
        store.insert_package(package(2, "Home 20 Mbps", "home-20m", 800, true)).await;
        store.insert_package(package(3, "Basic 5 Mbps", "basic-5m", 500, true)).await;
        store.insert_package(package(4, "Legacy 2 Mbps", "legacy-2m", 300, false)).await;

        for i in 0..12 {
            let status = if i % 4 == 3 { "reversed" } else { "completed" };
            store
                .insert_transaction(payment(i + 1, ACTIVE_USERNAME, i, status))
                .await
                .expect("Failed to seed payment");
        }
        store.insert_session(session(1, ACTIVE_USERNAME, 1000, 2000)).await;

        let state = AppState::new(test_config(), store.clone());

        Self {
            router: build_router(state),
            store,
            cookie: None,
        }
    }

    pub async fn request(&mut self, method: Method, uri: &str, body: Option<Value>) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = &self.cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to execute request");

        if let Some(set_cookie) = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
        {
            let pair = set_cookie.split(';').next().unwrap_or_default().to_string();
            let removed = pair.split_once('=').map_or(true, |(_, v)| v.is_empty())
                || set_cookie.contains("Max-Age=0");
            self.cookie = if removed { None } else { Some(pair) };
        }

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&mut self, uri: &str) -> TestResponse {
        self.request(Method::GET, uri, None).await
    }

    pub async fn post(&mut self, uri: &str, body: Value) -> TestResponse {
        self.request(Method::POST, uri, Some(body)).await
    }

    pub async fn login(&mut self, username: &str, password: &str) -> TestResponse {
        self.post(
            "/auth/login",
            serde_json::json!({ "username": username, "password": password }),
        )
        .await
    }

    /// Log in as the seeded active client and assert success.
    pub async fn login_active(&mut self) {
        let response = self.login(ACTIVE_USERNAME, PASSWORD).await;
        assert_eq!(response.status, StatusCode::OK, "login failed: {}", response.body);
        assert!(self.cookie.is_some(), "login did not set a session cookie");
    }

    pub fn has_session_cookie(&self) -> bool {
        self.cookie.is_some()
    }

    /// Forget the cookie without telling the server.
    pub fn drop_cookie(&mut self) {
        self.cookie = None;
    }
}
