//! Client ledger transaction model.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Ledger entry type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    Active,
    Renewal,
    Refund,
    TransferRefund,
    TransferReceived,
    AutoRenewal,
    PackageMigration,
    AdvancePayment,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Active => "ACTIVE",
            TransactionType::Renewal => "RENEWAL",
            TransactionType::Refund => "REFUND",
            TransactionType::TransferRefund => "TRANSFER_REFUND",
            TransactionType::TransferReceived => "TRANSFER_RECEIVED",
            TransactionType::AutoRenewal => "AUTO_RENEWAL",
            TransactionType::PackageMigration => "PACKAGE_MIGRATION",
            TransactionType::AdvancePayment => "ADVANCE_PAYMENT",
        }
    }

    pub fn from_string(s: &str) -> Option<Self> {
        match s {
            "ACTIVE" => Some(TransactionType::Active),
            "RENEWAL" => Some(TransactionType::Renewal),
            "REFUND" => Some(TransactionType::Refund),
            "TRANSFER_REFUND" => Some(TransactionType::TransferRefund),
            "TRANSFER_RECEIVED" => Some(TransactionType::TransferReceived),
            "AUTO_RENEWAL" => Some(TransactionType::AutoRenewal),
            "PACKAGE_MIGRATION" => Some(TransactionType::PackageMigration),
            "ADVANCE_PAYMENT" => Some(TransactionType::AdvancePayment),
            _ => None,
        }
    }
}

/// Ledger entry status. Transitions happen in the external billing system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    Pending,
    Completed,
    Failed,
    Reversed,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Pending => "pending",
            TransactionStatus::Completed => "completed",
            TransactionStatus::Failed => "failed",
            TransactionStatus::Reversed => "reversed",
        }
    }

    pub fn from_string(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(TransactionStatus::Pending),
            "completed" => Some(TransactionStatus::Completed),
            "failed" => Some(TransactionStatus::Failed),
            "reversed" => Some(TransactionStatus::Reversed),
            _ => None,
        }
    }
}

/// How a transaction was paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    VendorBalance,
    ClientBalance,
    Cash,
    BankTransfer,
    MobileBanking,
    Card,
    GatewaySslcommerz,
    GatewayBkash,
    GatewayNagad,
    GatewayStripe,
    GatewayPaypal,
    Free,
    Other,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::VendorBalance => "vendor_balance",
            PaymentMethod::ClientBalance => "client_balance",
            PaymentMethod::Cash => "cash",
            PaymentMethod::BankTransfer => "bank_transfer",
            PaymentMethod::MobileBanking => "mobile_banking",
            PaymentMethod::Card => "card",
            PaymentMethod::GatewaySslcommerz => "gateway_sslcommerz",
            PaymentMethod::GatewayBkash => "gateway_bkash",
            PaymentMethod::GatewayNagad => "gateway_nagad",
            PaymentMethod::GatewayStripe => "gateway_stripe",
            PaymentMethod::GatewayPaypal => "gateway_paypal",
            PaymentMethod::Free => "free",
            PaymentMethod::Other => "other",
        }
    }

    pub fn from_string(s: &str) -> Option<Self> {
        match s {
            "vendor_balance" => Some(PaymentMethod::VendorBalance),
            "client_balance" => Some(PaymentMethod::ClientBalance),
            "cash" => Some(PaymentMethod::Cash),
            "bank_transfer" => Some(PaymentMethod::BankTransfer),
            "mobile_banking" => Some(PaymentMethod::MobileBanking),
            "card" => Some(PaymentMethod::Card),
            "gateway_sslcommerz" => Some(PaymentMethod::GatewaySslcommerz),
            "gateway_bkash" => Some(PaymentMethod::GatewayBkash),
            "gateway_nagad" => Some(PaymentMethod::GatewayNagad),
            "gateway_stripe" => Some(PaymentMethod::GatewayStripe),
            "gateway_paypal" => Some(PaymentMethod::GatewayPaypal),
            "free" => Some(PaymentMethod::Free),
            "other" => Some(PaymentMethod::Other),
            _ => None,
        }
    }
}

/// Append-only ledger entry.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ClientTransaction {
    pub id: i64,
    pub transaction_ref: String,
    pub amount: Decimal,
    pub txn_type: String,
    pub status: String,
    pub total_balance: Decimal,
    pub payment_method: Option<String>,
    pub client_username: Option<String>,
    pub description: Option<String>,
    pub transaction_date: DateTime<Utc>,
    pub created_by: String,
}

impl ClientTransaction {
    pub fn transaction_type(&self) -> Option<TransactionType> {
        TransactionType::from_string(&self.txn_type)
    }

    pub fn transaction_status(&self) -> Option<TransactionStatus> {
        TransactionStatus::from_string(&self.status)
    }

    /// `Ok(None)` when no method was recorded, `Err` with the raw value when
    /// it is not a known method.
    pub fn method(&self) -> Result<Option<PaymentMethod>, &str> {
        match self.payment_method.as_deref() {
            None => Ok(None),
            Some(raw) => PaymentMethod::from_string(raw).map(Some).ok_or(raw),
        }
    }
}
