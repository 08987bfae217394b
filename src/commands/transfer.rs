use std::time::Instant;

use crate::models::TransferForm;
use crate::services::transfer_flow::Alerts;
use crate::services::{FlowError, OtpProgress, ResendStatus, Stage, TransferFlow};
use crate::session::Session;
use crate::utils::format_remaining;

const USAGE: &str = "💸 Transfer Command\n\
    Usage: `transfer <from account> <to account> <amount> <description>`\n\
    Example: `transfer 1111222233 4444555566 100.00 Rent`\n\
    Notes:\n  \
    • The amount must not exceed the sender's balance\n  \
    • You will be asked your security question, then an emailed OTP";

pub async fn execute(session: &mut Session, args: &[&str]) -> Result<String, String> {
    if args.len() < 4 {
        return Ok(USAGE.to_string());
    }

    let form = TransferForm {
        sender_account: args[0].to_string(),
        receiver_account: args[1].to_string(),
        amount: args[2].to_string(),
        description: args[3..].join(" "),
    };
    session.flow.set_form(form).map_err(|e| e.to_string())?;

    let result = session.flow.submit_transfer(&session.state).await;
    settle(session, result)?;
    Ok(render_stage(&session.flow, Instant::now()))
}

pub async fn answer(session: &mut Session, args: &[&str]) -> Result<String, String> {
    let result = session.flow.submit_answer(&args.join(" ")).await;
    settle(session, result)?;
    Ok(render_stage(&session.flow, Instant::now()))
}

pub async fn enter_otp(session: &mut Session, args: &[&str]) -> Result<String, String> {
    if args == ["clear"] {
        session.flow.clear_otp().map_err(|e| e.to_string())?;
        return Ok(render_stage(&session.flow, Instant::now()));
    }

    let digits: String = args.concat();
    let result = session.flow.type_otp(&digits, &mut session.state).await;
    match settle(session, result)? {
        OtpProgress::Incomplete { .. } => Ok(render_stage(&session.flow, Instant::now())),
        OtpProgress::Settled(tx) => Ok(settled_message(&tx)),
    }
}

pub async fn verify(session: &mut Session) -> Result<String, String> {
    let result = session.flow.verify_otp(&mut session.state).await;
    let tx = settle(session, result)?;
    Ok(settled_message(&tx))
}

pub fn resend(session: &Session) -> Result<String, String> {
    match session.flow.resend_otp(Instant::now()).map_err(|e| e.to_string())? {
        ResendStatus::CoolingDown(remaining) => Ok(format!(
            "⏳ You can request a new code in {}",
            format_remaining(remaining)
        )),
        ResendStatus::NotAvailable => Ok("📭 Resending codes is not available yet. \
            Use `back` and submit the transfer again to receive a new code."
            .to_string()),
    }
}

pub fn back(session: &mut Session) -> Result<String, String> {
    if session.flow.back() {
        Ok("↩️ Transfer abandoned. Your form values were kept; edit them with `transfer`.".to_string())
    } else {
        Err("Nothing to go back from; no transfer is being confirmed".to_string())
    }
}

pub fn status(session: &Session) -> Result<String, String> {
    Ok(render_stage(&session.flow, Instant::now()))
}

/// Turn a flow failure into the text shown to the user.
///
/// An expired session also abandons the wizard and the cached data, as the
/// pending transfer belonged to that session.
fn settle<T>(session: &mut Session, result: Result<T, FlowError>) -> Result<T, String> {
    match result {
        Ok(value) => Ok(value),
        Err(FlowError::SessionExpired) => {
            session.end();
            Err(format!("🔒 {}", FlowError::SessionExpired))
        }
        Err(err) => {
            let rendered = render_alerts(session.flow.alerts());
            if rendered.is_empty() {
                Err(err.to_string())
            } else {
                Err(rendered)
            }
        }
    }
}

fn render_alerts(alerts: &Alerts) -> String {
    let mut lines = Vec::new();
    if let Some(banner) = &alerts.banner {
        lines.push(format!("⚠️ {}", banner));
    }
    for error in &alerts.fields {
        lines.push(format!("  • {}: {}", error.field, error.message));
    }
    if let Some(otp) = &alerts.otp {
        lines.push(format!("  • otp: {}", otp));
    }
    lines.join("\n")
}

/// Current stage as the view shows it
pub fn render_stage<A>(flow: &TransferFlow<A>, now: Instant) -> String
where
    A: crate::api::TransferApi,
{
    match flow.stage() {
        Stage::Form => {
            let form = flow.form();
            if form == &TransferForm::default() {
                "💸 No transfer in progress. Start one with `transfer <from> <to> <amount> <description>`."
                    .to_string()
            } else {
                format!(
                    "💸 Transfer form\nFrom: {}\nTo: {}\nAmount: {}\nDescription: {}",
                    form.sender_account, form.receiver_account, form.amount, form.description
                )
            }
        }
        Stage::ConfirmingAnswer { request, question } => format!(
            "🔐 Confirm transfer\nFrom: {}\nTo: {}\nAmount: {}\nDescription: {}\n\n\
             Security question: {}\nReply with `answer <your answer>`, or `back` to edit.",
            request.sender_account,
            request.receiver_account,
            request.amount,
            request.description,
            question
        ),
        Stage::ConfirmingOtp { request, otp } => {
            let resend = if otp.resend.is_elapsed(now) {
                "`resend` is enabled".to_string()
            } else {
                format!("resend in {}", format_remaining(otp.resend.remaining(now)))
            };
            let mut view = format!(
                "📨 Enter the 6-digit code sent to your email\n\
                 Transfer: {} from {} to {}\n\
                 Code: {}{}\n\
                 Expires in: {} ({})\n\
                 Type the digits, `verify`, `otp clear` or `back`.",
                request.amount,
                request.sender_account,
                request.receiver_account,
                otp.input,
                "_".repeat(6usize.saturating_sub(otp.input.len())),
                format_remaining(otp.expiry.remaining(now)),
                resend
            );
            if let Some(error) = &flow.alerts().otp {
                view.push_str(&format!("\n⚠️ {}", error));
            }
            view
        }
    }
}

fn settled_message(tx: &crate::models::Transaction) -> String {
    let title = if tx.is_completed() {
        "✅ Transfer Successful".to_string()
    } else {
        format!("⏳ Transfer {}", tx.status)
    };
    let mut message = format!(
        "{}\nFrom: {}\nTo: {}\nAmount: {:.2} {}\nStatus: {}",
        title, tx.sender_account, tx.receiver_account, tx.amount, tx.currency, tx.status
    );
    if let Some(reference) = &tx.reference {
        message.push_str(&format!("\nReference: {}", reference));
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FieldError;
    use crate::models::FormField;

    #[test]
    fn test_render_alerts() {
        let alerts = Alerts {
            banner: Some("Daily limit reached".into()),
            fields: vec![FieldError::new(FormField::Amount, "Insufficient funds")],
            otp: None,
        };

        assert_eq!(
            render_alerts(&alerts),
            "⚠️ Daily limit reached\n  • amount: Insufficient funds"
        );
        assert_eq!(render_alerts(&Alerts::default()), "");
    }
}
