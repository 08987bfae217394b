//! Payment card models

use serde::{Deserialize, Serialize};
use std::fmt;

/// Card status as understood by the cards endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardStatus {
    Active,
    Blocked,
    Expired,
    #[serde(other)]
    Unknown,
}

impl fmt::Display for CardStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CardStatus::Active => "active",
            CardStatus::Blocked => "blocked",
            CardStatus::Expired => "expired",
            CardStatus::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    #[serde(deserialize_with = "super::string_or_number")]
    pub id: String,
    #[serde(alias = "masked_number")]
    pub card_number: String,
    #[serde(default)]
    pub card_type: String,
    pub status: CardStatus,
    #[serde(default)]
    pub expiry_date: Option<String>,
}

impl Card {
    /// Last four digits, whatever masking the server applied
    pub fn last_four(&self) -> &str {
        let digits = self.card_number.trim();
        let start = digits
            .char_indices()
            .rev()
            .nth(3)
            .map(|(idx, _)| idx)
            .unwrap_or(0);
        &digits[start..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_payload() {
        let card: Card = serde_json::from_str(
            r#"{"id": 12, "card_number": "**** **** **** 4821", "card_type": "debit", "status": "active"}"#,
        )
        .unwrap();

        assert_eq!(card.id, "12");
        assert_eq!(card.last_four(), "4821");
        assert_eq!(card.status, CardStatus::Active);
    }

    #[test]
    fn test_unknown_status() {
        let card: Card = serde_json::from_str(
            r#"{"id": "c-1", "masked_number": "12", "status": "pending_activation"}"#,
        )
        .unwrap();

        assert_eq!(card.status, CardStatus::Unknown);
        assert_eq!(card.last_four(), "12");
    }
}
