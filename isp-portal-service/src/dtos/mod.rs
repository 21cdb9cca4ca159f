use serde::{Deserialize, Serialize};

pub const DEFAULT_HISTORY_LIMIT: i64 = 10;
pub const MAX_HISTORY_LIMIT: i64 = 100;

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub client_id: i64,
    pub client_username: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AutoRenewResponse {
    pub auto_renew: bool,
}

#[derive(Debug, Deserialize)]
pub struct NextPackageRequest {
    pub profile_name: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateTicketRequest {
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub description: String,
}

/// `?limit=` for history listings: defaults to 10, clamped to 1..=100.
#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<i64>,
}

impl HistoryQuery {
    pub fn limit(&self) -> i64 {
        self.limit
            .unwrap_or(DEFAULT_HISTORY_LIMIT)
            .clamp(1, MAX_HISTORY_LIMIT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_limit_is_clamped() {
        assert_eq!(HistoryQuery { limit: None }.limit(), 10);
        assert_eq!(HistoryQuery { limit: Some(0) }.limit(), 1);
        assert_eq!(HistoryQuery { limit: Some(-5) }.limit(), 1);
        assert_eq!(HistoryQuery { limit: Some(25) }.limit(), 25);
        assert_eq!(HistoryQuery { limit: Some(5000) }.limit(), 100);
    }
}
