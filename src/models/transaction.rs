//! Transaction models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A settled transaction record.
///
/// Returned by OTP verification for the transfer just finalized and by the
/// transaction history endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(
        default,
        alias = "id",
        alias = "transaction_id",
        deserialize_with = "super::opt_string_or_number"
    )]
    pub reference: Option<String>,
    pub amount: Decimal,
    #[serde(default)]
    pub currency: String,
    pub sender_account: String,
    pub receiver_account: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Transaction {
    pub fn is_completed(&self) -> bool {
        self.status.eq_ignore_ascii_case("completed")
    }

    /// Short date for history tables, empty when the server sent none
    pub fn date(&self) -> String {
        self.created_at
            .map(|ts| ts.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default()
    }
}
