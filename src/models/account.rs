//! Bank account models

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A customer account as listed by the accounts endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub account_number: String,
    #[serde(default)]
    pub account_type: String,
    pub balance: Decimal,
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub status: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_balance_accepts_string_and_number() {
        let from_str: Account = serde_json::from_str(
            r#"{"account_number": "1111222233", "balance": "250.50", "currency": "NPR"}"#,
        )
        .unwrap();
        let from_num: Account = serde_json::from_str(
            r#"{"account_number": "1111222233", "balance": 250.5, "currency": "NPR"}"#,
        )
        .unwrap();

        assert_eq!(from_str.balance, Decimal::new(25050, 2));
        assert_eq!(from_num.balance, from_str.balance);
        assert_eq!(from_str.account_type, "");
    }
}
