//! Funds transfer confirmation flow
//!
//! A transfer goes through three server calls, each gated on the previous
//! response:
//!
//! ```text
//! Form --initiate--> ConfirmingAnswer --answer--> ConfirmingOtp --otp--> Form
//! ```
//!
//! Failures keep the current stage so the user can retry it; `back` abandons
//! the pending transfer without telling the server, which expires it on its
//! own. Every handler records its failure in [`Alerts`] for the view and
//! returns it, so nothing escapes to the command loop.

use rust_decimal::Decimal;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info, warn};

use super::portal_state::PortalState;
use crate::api::{ApiError, TransferApi};
use crate::models::{
    parse_expiry_minutes, security_question_prompt, FieldError, FormField, Transaction,
    TransferForm, TransferRequest,
};
use crate::utils::{Countdown, Notice};

pub const OTP_LENGTH: usize = 6;
/// The resend affordance becomes enabled this long after the OTP stage opens
pub const RESEND_AFTER: Duration = Duration::from_secs(60);
/// Longest OTP countdown shown, whatever expiry the server reports
pub const MAX_OTP_EXPIRY_MINUTES: u64 = 24 * 60;
/// How long the success notification stays visible
pub const NOTICE_TTL: Duration = Duration::from_secs(3);

const INITIATE_FAILURE: &str = "Unable to initiate the transfer. Please try again.";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FlowError {
    #[error("Please correct the highlighted fields")]
    Validation(Vec<FieldError>),
    #[error("{0}")]
    Rejected(String),
    #[error("Something went wrong. Please try again.")]
    Unavailable,
    #[error("Your session has expired. Please log in again.")]
    SessionExpired,
    #[error("A request is already in progress")]
    Busy,
    #[error("Cannot {action} while {stage}")]
    WrongStage {
        action: &'static str,
        stage: &'static str,
    },
    #[error("{0}")]
    InvalidOtp(&'static str),
}

impl From<ApiError> for FlowError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Rejected(messages) if !messages.is_empty() => {
                FlowError::Rejected(messages.join(" "))
            }
            ApiError::SessionExpired | ApiError::Unauthorized(_) => FlowError::SessionExpired,
            other => {
                warn!("Transfer request failed: {}", other);
                FlowError::Unavailable
            }
        }
    }
}

/// The OTP stage's input field and timers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtpChallenge {
    pub input: String,
    pub expiry_minutes: u64,
    pub expiry: Countdown,
    pub resend: Countdown,
}

impl OtpChallenge {
    fn open(expiry_minutes: u64, now: Instant) -> Self {
        if expiry_minutes > MAX_OTP_EXPIRY_MINUTES {
            warn!(
                "OTP expiry of {} minute(s) capped at {}",
                expiry_minutes, MAX_OTP_EXPIRY_MINUTES
            );
        }
        let expiry_minutes = expiry_minutes.min(MAX_OTP_EXPIRY_MINUTES);
        Self {
            input: String::new(),
            expiry_minutes,
            expiry: Countdown::starting_at(now, Duration::from_secs(expiry_minutes * 60)),
            resend: Countdown::starting_at(now, RESEND_AFTER),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stage {
    Form,
    ConfirmingAnswer {
        request: TransferRequest,
        question: &'static str,
    },
    ConfirmingOtp {
        request: TransferRequest,
        otp: OtpChallenge,
    },
}

impl Stage {
    pub fn name(&self) -> &'static str {
        match self {
            Stage::Form => "on the transfer form",
            Stage::ConfirmingAnswer { .. } => "confirming the security question",
            Stage::ConfirmingOtp { .. } => "confirming the OTP",
        }
    }
}

/// What the view shows above and inside the active stage
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Alerts {
    pub banner: Option<String>,
    pub fields: Vec<FieldError>,
    pub otp: Option<String>,
}

impl Alerts {
    pub fn clear(&mut self) {
        *self = Alerts::default();
    }

    pub fn field(&self, field: FormField) -> Option<&'static str> {
        self.fields.iter().find(|e| e.field == field).map(|e| e.message)
    }
}

/// Result of feeding the OTP field
#[derive(Debug, Clone, PartialEq)]
pub enum OtpProgress {
    Incomplete { entered: usize },
    Settled(Transaction),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResendStatus {
    CoolingDown(Duration),
    /// Enabled but not backed by a server call
    NotAvailable,
}

pub struct TransferFlow<A> {
    api: A,
    stage: Stage,
    form: TransferForm,
    alerts: Alerts,
    notice: Option<Notice>,
    busy: bool,
}

impl<A: TransferApi> TransferFlow<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            stage: Stage::Form,
            form: TransferForm::default(),
            alerts: Alerts::default(),
            notice: None,
            busy: false,
        }
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    pub fn form(&self) -> &TransferForm {
        &self.form
    }

    pub fn alerts(&self) -> &Alerts {
        &self.alerts
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// The success notification, while it is still visible
    pub fn notice(&self, now: Instant) -> Option<&str> {
        self.notice
            .as_ref()
            .filter(|n| n.is_visible(now))
            .map(|n| n.message.as_str())
    }

    /// Replace the form values; only meaningful on the form stage
    pub fn set_form(&mut self, form: TransferForm) -> Result<(), FlowError> {
        self.expect_form("edit the transfer form")?;
        self.form = form;
        Ok(())
    }

    /// Validate the form and create the pending transfer.
    ///
    /// No network call is made unless local validation passes.
    pub async fn submit_transfer(&mut self, state: &PortalState) -> Result<(), FlowError> {
        self.expect_form("submit a transfer")?;
        self.guard_busy()?;
        self.alerts.clear();

        let sender_balance = state.balance_of(self.form.sender_account.trim());
        let request = match self.form.validate(sender_balance) {
            Ok(request) => request,
            Err(errors) => {
                self.alerts.fields = errors.clone();
                return Err(FlowError::Validation(errors));
            }
        };

        debug!(
            "Initiating transfer of {} from {} to {}",
            request.amount, request.sender_account, request.receiver_account
        );
        self.busy = true;
        let result = self.api.initiate_transfer(&request).await;
        self.busy = false;

        let outcome = match result {
            Ok(ack) if ack.is_accepted() => Ok(()),
            Ok(ack) => {
                warn!("Transfer initiation not accepted: {:?}", ack.status_code);
                Err(FlowError::Rejected(
                    ack.message.unwrap_or_else(|| INITIATE_FAILURE.to_string()),
                ))
            }
            Err(e) => Err(FlowError::from(e)),
        };

        match outcome {
            Ok(()) => {
                let question = security_question_prompt(
                    state.profile().and_then(|p| p.security_question.as_deref()),
                );
                self.stage = Stage::ConfirmingAnswer { request, question };
                debug!("Transfer initiated, awaiting security answer");
                Ok(())
            }
            Err(e) => Err(self.banner(e)),
        }
    }

    /// Answer the security question; success opens the OTP stage
    pub async fn submit_answer(&mut self, answer: &str) -> Result<(), FlowError> {
        let request = match &self.stage {
            Stage::ConfirmingAnswer { request, .. } => request.clone(),
            other => {
                return Err(FlowError::WrongStage {
                    action: "answer the security question",
                    stage: other.name(),
                })
            }
        };
        self.guard_busy()?;
        self.alerts.clear();

        let answer = answer.trim();
        if answer.is_empty() {
            let errors = vec![FieldError::new(FormField::SecurityAnswer, "This field is required")];
            self.alerts.fields = errors.clone();
            return Err(FlowError::Validation(errors));
        }

        self.busy = true;
        let result = self.api.verify_security_answer(answer).await;
        self.busy = false;

        match result {
            Ok(challenge) => {
                let minutes = parse_expiry_minutes(&challenge.expiry_time).unwrap_or_else(|| {
                    warn!("Unparseable OTP expiry {:?}", challenge.expiry_time);
                    0
                });
                self.stage = Stage::ConfirmingOtp {
                    request,
                    otp: OtpChallenge::open(minutes, Instant::now()),
                };
                debug!("Security answer accepted, OTP valid for {} minute(s)", minutes);
                Ok(())
            }
            Err(e) => Err(self.banner(FlowError::from(e))),
        }
    }

    /// Replace the OTP field's value, as an input change event would.
    ///
    /// Verification fires on its own when the change leaves exactly six digits.
    pub async fn input_otp(
        &mut self,
        value: &str,
        state: &mut PortalState,
    ) -> Result<OtpProgress, FlowError> {
        self.otp_challenge_mut("enter an OTP")?;

        if !value.chars().all(|c| c.is_ascii_digit()) {
            let err = FlowError::InvalidOtp("The OTP must contain digits only");
            self.alerts.otp = Some(err.to_string());
            return Err(err);
        }

        let value: String = value.chars().take(OTP_LENGTH).collect();
        let otp = self.otp_challenge_mut("enter an OTP")?;
        let changed = otp.input != value;
        otp.input = value;
        let entered = otp.input.len();
        self.alerts.otp = None;

        if changed && entered == OTP_LENGTH {
            return self.verify_otp(state).await.map(OtpProgress::Settled);
        }
        Ok(OtpProgress::Incomplete { entered })
    }

    /// Append typed digits to the OTP field
    pub async fn type_otp(
        &mut self,
        digits: &str,
        state: &mut PortalState,
    ) -> Result<OtpProgress, FlowError> {
        let current = self.otp_challenge_mut("enter an OTP")?.input.clone();
        self.input_otp(&format!("{}{}", current, digits), state).await
    }

    pub fn clear_otp(&mut self) -> Result<(), FlowError> {
        self.otp_challenge_mut("clear the OTP")?.input.clear();
        self.alerts.otp = None;
        Ok(())
    }

    /// Verify the code in the OTP field and settle the transfer
    pub async fn verify_otp(&mut self, state: &mut PortalState) -> Result<Transaction, FlowError> {
        let code = self.otp_challenge_mut("verify an OTP")?.input.clone();
        self.guard_busy()?;

        if code.len() != OTP_LENGTH {
            let err = FlowError::InvalidOtp("Enter the 6-digit code");
            self.alerts.otp = Some(err.to_string());
            return Err(err);
        }

        self.busy = true;
        let result = self.api.verify_otp(&code).await;
        self.busy = false;

        match result {
            Ok(settled) => {
                let changed = state.apply_settled_transfer(&settled);
                info!(
                    "Transfer of {} from {} to {} settled ({} local balance(s) updated)",
                    settled.amount, settled.sender_account, settled.receiver_account, changed
                );
                self.notice = Some(Notice::new(
                    success_message(settled.amount, &settled.currency, &settled.receiver_account),
                    Instant::now(),
                    NOTICE_TTL,
                ));
                self.reset();
                Ok(settled)
            }
            Err(e) => {
                let err = FlowError::from(e);
                self.alerts.otp = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// Resend is displayed but has no server contract behind it
    pub fn resend_otp(&self, now: Instant) -> Result<ResendStatus, FlowError> {
        match &self.stage {
            Stage::ConfirmingOtp { otp, .. } => {
                if !otp.resend.is_elapsed(now) {
                    return Ok(ResendStatus::CoolingDown(otp.resend.remaining(now)));
                }
                debug!("OTP resend requested; no resend endpoint is wired");
                Ok(ResendStatus::NotAvailable)
            }
            other => Err(FlowError::WrongStage {
                action: "resend the OTP",
                stage: other.name(),
            }),
        }
    }

    /// Leave a confirmation stage for the form, keeping the typed values.
    ///
    /// Returns false when already on the form.
    pub fn back(&mut self) -> bool {
        if matches!(self.stage, Stage::Form) {
            return false;
        }
        debug!("Pending transfer abandoned from stage: {}", self.stage.name());
        self.stage = Stage::Form;
        self.alerts.clear();
        self.busy = false;
        true
    }

    /// Return to an empty form, dropping every countdown
    pub fn reset(&mut self) {
        self.stage = Stage::Form;
        self.form = TransferForm::default();
        self.alerts.clear();
        self.busy = false;
    }

    fn expect_form(&self, action: &'static str) -> Result<(), FlowError> {
        match self.stage {
            Stage::Form => Ok(()),
            ref other => Err(FlowError::WrongStage {
                action,
                stage: other.name(),
            }),
        }
    }

    fn otp_challenge_mut(&mut self, action: &'static str) -> Result<&mut OtpChallenge, FlowError> {
        match &mut self.stage {
            Stage::ConfirmingOtp { otp, .. } => Ok(otp),
            other => Err(FlowError::WrongStage {
                action,
                stage: other.name(),
            }),
        }
    }

    fn guard_busy(&self) -> Result<(), FlowError> {
        if self.busy {
            Err(FlowError::Busy)
        } else {
            Ok(())
        }
    }

    fn banner(&mut self, err: FlowError) -> FlowError {
        self.alerts.banner = Some(err.to_string());
        err
    }
}

fn success_message(amount: Decimal, currency: &str, receiver: &str) -> String {
    let currency = if currency.is_empty() {
        String::new()
    } else {
        format!(" {}", currency)
    };
    format!("Transfer of {}{} to {} completed", amount, currency, receiver)
}
