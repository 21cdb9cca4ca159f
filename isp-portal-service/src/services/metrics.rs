//! Metrics module for isp-portal-service.
//! Provides Prometheus metrics for store access and portal activity.

use once_cell::sync::Lazy;
use prometheus::{
    histogram_opts, opts, register_histogram_vec, register_int_counter,
    register_int_counter_vec, Encoder, HistogramVec, IntCounter, IntCounterVec, TextEncoder,
};
use std::sync::OnceLock;

/// Database query duration histogram
pub static DB_QUERY_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        histogram_opts!(
            "portal_db_query_duration_seconds",
            "Database query duration"
        ),
        &["operation"]
    )
    .expect("Failed to register DB_QUERY_DURATION")
});

/// Login attempts by outcome
pub static LOGIN_ATTEMPTS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();

/// Support tickets opened
pub static TICKETS_CREATED_TOTAL: OnceLock<IntCounter> = OnceLock::new();

/// Dashboard views assembled
pub static PROFILE_VIEWS_TOTAL: OnceLock<IntCounter> = OnceLock::new();

/// Dashboard sections served empty after a failed read
pub static DEGRADED_READS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();

/// Error counter for alerting
pub static ERRORS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();

/// Initialize all metrics. Call once at startup.
pub fn init_metrics() {
    LOGIN_ATTEMPTS_TOTAL.get_or_init(|| {
        register_int_counter_vec!(
            opts!(
                "portal_login_attempts_total",
                "Total client login attempts by outcome"
            ),
            &["outcome"]
        )
        .expect("Failed to register LOGIN_ATTEMPTS_TOTAL")
    });

    TICKETS_CREATED_TOTAL.get_or_init(|| {
        register_int_counter!(opts!(
            "portal_tickets_created_total",
            "Total support tickets created"
        ))
        .expect("Failed to register TICKETS_CREATED_TOTAL")
    });

    PROFILE_VIEWS_TOTAL.get_or_init(|| {
        register_int_counter!(opts!(
            "portal_profile_views_total",
            "Total dashboard views assembled"
        ))
        .expect("Failed to register PROFILE_VIEWS_TOTAL")
    });

    DEGRADED_READS_TOTAL.get_or_init(|| {
        register_int_counter_vec!(
            opts!(
                "portal_degraded_reads_total",
                "Dashboard sections replaced by empty data after a failed read"
            ),
            &["section"]
        )
        .expect("Failed to register DEGRADED_READS_TOTAL")
    });

    ERRORS_TOTAL.get_or_init(|| {
        register_int_counter_vec!(
            opts!("portal_errors_total", "Total errors by type for alerting"),
            &["error_type", "operation"]
        )
        .expect("Failed to register ERRORS_TOTAL")
    });

    // Force initialization of lazy statics
    let _ = &*DB_QUERY_DURATION;
}

/// Get metrics in Prometheus text format.
pub fn get_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!(error = %e, "Failed to encode metrics");
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}

/// Record a login attempt.
pub fn record_login_attempt(outcome: &str) {
    if let Some(counter) = LOGIN_ATTEMPTS_TOTAL.get() {
        counter.with_label_values(&[outcome]).inc();
    }
}

/// Record a created ticket.
pub fn record_ticket_created() {
    if let Some(counter) = TICKETS_CREATED_TOTAL.get() {
        counter.inc();
    }
}

/// Record an assembled dashboard view.
pub fn record_profile_view() {
    if let Some(counter) = PROFILE_VIEWS_TOTAL.get() {
        counter.inc();
    }
}

/// Record a degraded dashboard section.
pub fn record_degraded_read(section: &str) {
    if let Some(counter) = DEGRADED_READS_TOTAL.get() {
        counter.with_label_values(&[section]).inc();
    }
}

/// Record an error for alerting.
pub fn record_error(error_type: &str, operation: &str) {
    if let Some(counter) = ERRORS_TOTAL.get() {
        counter.with_label_values(&[error_type, operation]).inc();
    }
}
