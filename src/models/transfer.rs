//! Funds transfer models
//!
//! `TransferForm` holds the raw field values as typed by the user. It only
//! becomes a `TransferRequest` after local validation succeeds, so every
//! request handed to the initiate endpoint already satisfies the form rules.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const INITIATE_ACCEPTED: u16 = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FormField {
    SenderAccount,
    ReceiverAccount,
    Amount,
    Description,
    SecurityAnswer,
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FormField::SenderAccount => "sender_account",
            FormField::ReceiverAccount => "receiver_account",
            FormField::Amount => "amount",
            FormField::Description => "description",
            FormField::SecurityAnswer => "security_answer",
        };
        f.write_str(name)
    }
}

/// Field-scoped validation error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: FormField,
    pub message: &'static str,
}

impl FieldError {
    pub fn new(field: FormField, message: &'static str) -> Self {
        Self { field, message }
    }
}

/// Raw transfer form values
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransferForm {
    pub sender_account: String,
    pub receiver_account: String,
    pub amount: String,
    pub description: String,
}

impl TransferForm {
    /// Validate the form against the sender's locally cached balance.
    ///
    /// `sender_balance` is `None` when the sender account is not one of the
    /// customer's cached accounts. All failing fields are reported together.
    pub fn validate(&self, sender_balance: Option<Decimal>) -> Result<TransferRequest, Vec<FieldError>> {
        const REQUIRED: &str = "This field is required";

        let sender = self.sender_account.trim();
        let receiver = self.receiver_account.trim();
        let amount_text = self.amount.trim();
        let description = self.description.trim();
        let mut errors = Vec::new();

        if sender.is_empty() {
            errors.push(FieldError::new(FormField::SenderAccount, REQUIRED));
        } else if sender_balance.is_none() {
            errors.push(FieldError::new(
                FormField::SenderAccount,
                "Select one of your accounts",
            ));
        }

        if receiver.is_empty() {
            errors.push(FieldError::new(FormField::ReceiverAccount, REQUIRED));
        } else if receiver == sender {
            errors.push(FieldError::new(
                FormField::ReceiverAccount,
                "Sender and receiver accounts must differ",
            ));
        }

        let amount = if amount_text.is_empty() {
            errors.push(FieldError::new(FormField::Amount, REQUIRED));
            None
        } else {
            match amount_text.parse::<Decimal>() {
                Err(_) => {
                    errors.push(FieldError::new(FormField::Amount, "Enter a valid amount"));
                    None
                }
                Ok(value) if value <= Decimal::ZERO => {
                    errors.push(FieldError::new(
                        FormField::Amount,
                        "Amount must be greater than zero",
                    ));
                    None
                }
                Ok(value) => {
                    if let Some(balance) = sender_balance {
                        if value > balance {
                            errors.push(FieldError::new(FormField::Amount, "Insufficient funds"));
                        }
                    }
                    Some(value)
                }
            }
        };

        if description.is_empty() {
            errors.push(FieldError::new(FormField::Description, REQUIRED));
        }

        match amount {
            Some(amount) if errors.is_empty() => Ok(TransferRequest {
                sender_account: sender.to_string(),
                receiver_account: receiver.to_string(),
                amount,
                description: description.to_string(),
            }),
            _ => Err(errors),
        }
    }
}

/// Validated transfer, serialized as the initiate request body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransferRequest {
    pub sender_account: String,
    pub receiver_account: String,
    pub amount: Decimal,
    pub description: String,
}

/// Acknowledgement of the initiate call.
///
/// The server signals acceptance with a `status_code` field inside the
/// payload, independent of the HTTP status.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InitiateAck {
    pub status_code: Option<u16>,
    pub message: Option<String>,
}

impl InitiateAck {
    /// Read the acknowledgement from either the top level or the `initiate_transfer` envelope
    pub fn from_payload(payload: &serde_json::Value) -> Self {
        let scopes = [Some(payload), payload.get("initiate_transfer")];
        let mut ack = InitiateAck::default();

        for scope in scopes.into_iter().flatten() {
            if ack.status_code.is_none() {
                ack.status_code = scope
                    .get("status_code")
                    .and_then(|v| v.as_u64().or_else(|| v.as_str().and_then(|s| s.parse().ok())))
                    .and_then(|code| u16::try_from(code).ok());
            }
            if ack.message.is_none() {
                ack.message = scope
                    .get("message")
                    .or_else(|| scope.get("detail"))
                    .and_then(|v| v.as_str())
                    .map(str::to_string);
            }
        }

        ack
    }

    pub fn is_accepted(&self) -> bool {
        self.status_code == Some(INITIATE_ACCEPTED)
    }
}

/// Issued after the security answer is accepted; the OTP has been dispatched
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SecurityChallenge {
    pub expiry_time: String,
}

/// Parse an `HH:MM:SS` expiry into whole minutes.
///
/// Seconds are dropped: `01:05:30` is 65 minutes.
pub fn parse_expiry_minutes(expiry: &str) -> Option<u64> {
    let mut parts = expiry.trim().split(':');
    let hours: u64 = parts.next()?.trim().parse().ok()?;
    let minutes: u64 = parts.next()?.trim().parse().ok()?;
    let seconds: u64 = parts.next()?.trim().parse().ok()?;
    if parts.next().is_some() || minutes >= 60 || seconds >= 60 {
        return None;
    }
    hours.checked_mul(60)?.checked_add(minutes)
}
