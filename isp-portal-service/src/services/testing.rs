//! Row builders shared by the unit tests.

use crate::models::{AccountingSession, ClientAccount, ClientTransaction, PackagePlan};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

pub fn client(id: i64, username: &str) -> ClientAccount {
    ClientAccount {
        id,
        name: format!("Client {}", username),
        username: username.to_string(),
        password_hash: String::new(),
        mobile_number: "01700000000".to_string(),
        email: format!("{}@example.com", username),
        description: None,
        balance: Decimal::new(500, 0),
        address_line1: None,
        address_line2: None,
        city: Some("Dhaka".to_string()),
        district: None,
        upazila: None,
        union_name: None,
        zip: None,
        status: "active".to_string(),
        payment_date: None,
        payment_type: None,
        auto_renew: true,
        user_profile: Some("home-10m".to_string()),
        next_user_profile: None,
        created_date: Utc::now(),
        updated_date: None,
    }
}

pub fn package(id: i64, name: &str, profile_name: &str, price: i64) -> PackagePlan {
    PackagePlan {
        id,
        name: name.to_string(),
        pool_name: None,
        profile_name: profile_name.to_string(),
        price: Decimal::new(price, 0),
        currency: "BDT".to_string(),
        is_active: true,
        created_date: Utc::now(),
    }
}

pub fn session(
    id: i64,
    username: &str,
    start: Option<DateTime<Utc>>,
    input: Option<i64>,
    output: Option<i64>,
) -> AccountingSession {
    AccountingSession {
        radacctid: id,
        acctsessionid: format!("8100{:04}", id),
        acctuniqueid: format!("u{}", id),
        username: username.to_string(),
        acctstarttime: start,
        acctstoptime: None,
        acctsessiontime: None,
        acctinputoctets: input,
        acctoutputoctets: output,
        framedipaddress: "10.10.0.2".to_string(),
        acctterminatecause: String::new(),
    }
}

pub fn transaction(id: i64, username: &str, date: DateTime<Utc>, status: &str) -> ClientTransaction {
    ClientTransaction {
        id,
        transaction_ref: format!("TXN-{:06}", id),
        amount: Decimal::new(500, 0),
        txn_type: "RENEWAL".to_string(),
        status: status.to_string(),
        total_balance: Decimal::new(500, 0),
        payment_method: Some("cash".to_string()),
        client_username: Some(username.to_string()),
        description: None,
        transaction_date: date,
        created_by: "admin".to_string(),
    }
}
