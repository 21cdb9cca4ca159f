//! Package status derived from account status and the paid-through date.

use crate::models::{AccountStatus, ClientAccount, PackageStatus};
use chrono::{DateTime, TimeZone};

/// Resolve the dashboard package status.
///
/// An inactive account is `Inactive` whatever its payment date. An active
/// account is `Expired` only once `now` is strictly past `payment_date`; an
/// active account without a payment date never expires.
pub fn resolve_status<Tz: TimeZone>(account: &ClientAccount, now: &DateTime<Tz>) -> PackageStatus {
    if account.account_status() != AccountStatus::Active {
        return PackageStatus::Inactive;
    }

    match account.payment_date {
        Some(paid_through) if *now > paid_through => PackageStatus::Expired,
        _ => PackageStatus::Active,
    }
}
