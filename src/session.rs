use std::sync::Arc;
use std::time::Instant;

use crate::api::PortalClient;
use crate::services::{PortalState, Stage, TransferFlow};
use crate::utils::format_remaining;

/// Everything one terminal session owns: the API client, the cached portal
/// state and the single transfer wizard.
pub struct Session {
    pub client: Arc<PortalClient>,
    pub state: PortalState,
    pub flow: TransferFlow<Arc<PortalClient>>,
}

impl Session {
    pub fn new(client: Arc<PortalClient>) -> Self {
        Self {
            flow: TransferFlow::new(Arc::clone(&client)),
            client,
            state: PortalState::default(),
        }
    }

    pub fn is_logged_in(&self) -> bool {
        self.state.profile().is_some()
    }

    /// Forget cached data and any transfer in progress
    pub fn end(&mut self) {
        self.flow.reset();
        self.state.clear();
    }

    /// Prompt line, derived from the current stage and countdowns at `now`
    pub fn prompt(&self, now: Instant) -> String {
        let mut prompt = String::new();
        if let Some(notice) = self.flow.notice(now) {
            prompt.push_str(&format!("✅ {}\n", notice));
        }

        let label = match self.flow.stage() {
            _ if self.flow.is_busy() => "working".to_string(),
            Stage::Form if self.is_logged_in() => "portal".to_string(),
            Stage::Form => "portal (logged out)".to_string(),
            Stage::ConfirmingAnswer { .. } => "transfer [security question]".to_string(),
            Stage::ConfirmingOtp { otp, .. } => {
                let resend = if otp.resend.is_elapsed(now) {
                    "resend ready".to_string()
                } else {
                    format!("resend {}", format_remaining(otp.resend.remaining(now)))
                };
                format!(
                    "transfer [otp {}/6 | expires {} | {}]",
                    otp.input.len(),
                    format_remaining(otp.expiry.remaining(now)),
                    resend
                )
            }
        };

        prompt.push_str(&label);
        prompt.push_str("> ");
        prompt
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_prompt_when_logged_out() {
        let client = PortalClient::new("http://localhost:8000", Duration::from_secs(5)).unwrap();
        let session = Session::new(Arc::new(client));

        assert!(!session.is_logged_in());
        assert_eq!(session.prompt(Instant::now()), "portal (logged out)> ");
    }
}
