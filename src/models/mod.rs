//! Data models for the portal
//!
//! Everything here is a transient, session-scoped copy of data owned by the
//! banking API server. The transfer models double as the request bodies sent
//! to the transfer endpoints.

pub mod account;
pub mod card;
pub mod profile;
pub mod transaction;
pub mod transfer;

pub use account::Account;
pub use card::{Card, CardStatus};
pub use profile::{security_question_prompt, NextOfKin, Profile, Role};
pub use transaction::Transaction;
pub use transfer::{
    parse_expiry_minutes, FieldError, FormField, InitiateAck, SecurityChallenge, TransferForm,
    TransferRequest,
};

use serde::{Deserialize, Deserializer};

/// Accept an identifier that the server may send either as a JSON string or a number.
pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number, got {}",
            other
        ))),
    }
}

/// Optional variant of [`string_or_number`], treating `null` as absent.
pub(crate) fn opt_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<serde_json::Value>::deserialize(deserializer)? {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(s)) => Ok(Some(s)),
        Some(serde_json::Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected string or number, got {}",
            other
        ))),
    }
}
