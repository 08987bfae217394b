pub mod accounts;
pub mod cards;
pub mod dashboard;
pub mod help;
pub mod login;
pub mod profile;
pub mod transactions;
pub mod transfer;

use tracing::{debug, warn};

use crate::services::{FlowError, Stage};
use crate::session::Session;

/// What the command loop should do after a line has been handled
#[derive(Debug, PartialEq, Eq)]
pub enum Dispatch {
    Reply(String),
    Silent,
    Quit,
}

/// Commands that work without a session
const PUBLIC_COMMANDS: &[&str] = &["help", "?", "login", "quit", "exit"];

pub async fn handle_line(session: &mut Session, line: &str) -> Dispatch {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.is_empty() {
        return Dispatch::Silent;
    }

    let command = parts[0].to_lowercase();
    let args = &parts[1..];

    // digits typed on the OTP stage go straight into the code field
    if matches!(session.flow.stage(), Stage::ConfirmingOtp { .. })
        && parts.len() == 1
        && command.chars().all(|c| c.is_ascii_digit())
    {
        let result = transfer::enter_otp(session, &parts).await;
        return finish(session, result).await;
    }

    if !session.is_logged_in() && !PUBLIC_COMMANDS.contains(&command.as_str()) {
        return Dispatch::Reply("🔒 Please log in first: `login <email> <password>`".to_string());
    }

    debug!("Dispatching command {}", command);
    let result = match command.as_str() {
        "help" | "?" => help::execute(args),
        "login" => login::execute(session, args).await,
        "logout" => login::logout(session).await,
        "dashboard" | "dash" => dashboard::execute(session),
        "accounts" | "acc" => accounts::execute(session),
        "refresh" => accounts::refresh(session).await,
        "transactions" | "tx" => transactions::execute(session, args),
        "cards" => cards::execute(session),
        "card" => cards::update(session, args).await,
        "profile" => profile::execute(session),
        "kin" => profile::next_of_kin(session, args).await,
        "transfer" | "send" => transfer::execute(session, args).await,
        "answer" => transfer::answer(session, args).await,
        "otp" => transfer::enter_otp(session, args).await,
        "verify" => transfer::verify(session).await,
        "resend" => transfer::resend(session),
        "back" => transfer::back(session),
        "status" => transfer::status(session),
        "quit" | "exit" => return Dispatch::Quit,
        _ => Err(format!("❓ Unknown command `{}`. Type `help` for a list.", command)),
    };

    finish(session, result).await
}

/// Render a handler's result, ending the session if the client lost its tokens
async fn finish(session: &mut Session, result: Result<String, String>) -> Dispatch {
    if result.is_err() && session.is_logged_in() && !session.client.is_authenticated().await {
        warn!("Session expired, returning to login");
        session.end();
        return Dispatch::Reply(format!("🔒 {}", FlowError::SessionExpired));
    }
    render(result)
}

fn render(result: Result<String, String>) -> Dispatch {
    match result {
        Ok(reply) => Dispatch::Reply(reply),
        Err(error_msg) => {
            debug!("Command failed: {}", error_msg);
            let user_message = if error_msg.trim().is_empty() {
                "❌ An error occurred while executing the command.".to_string()
            } else if error_msg.starts_with(char::is_alphanumeric) {
                format!("❌ {}", error_msg)
            } else {
                error_msg
            };
            Dispatch::Reply(user_message)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::portal::test_server::{login_script, TestServer};
    use crate::api::PortalClient;
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;

    fn session() -> Session {
        let client = PortalClient::new("http://localhost:8000", Duration::from_secs(5)).unwrap();
        Session::new(Arc::new(client))
    }

    #[tokio::test]
    async fn test_blank_and_quit() {
        let mut session = session();
        assert_eq!(handle_line(&mut session, "   ").await, Dispatch::Silent);
        assert_eq!(handle_line(&mut session, "QUIT").await, Dispatch::Quit);
    }

    #[tokio::test]
    async fn test_requires_login() {
        let mut session = session();
        match handle_line(&mut session, "accounts").await {
            Dispatch::Reply(reply) => assert!(reply.contains("log in")),
            other => panic!("unexpected {:?}", other),
        }
        match handle_line(&mut session, "help").await {
            Dispatch::Reply(reply) => assert!(reply.contains("transfer")),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_expired_session_returns_to_login() {
        let mut script = login_script();
        script.push((401, json!({"detail": "Token expired"})));
        script.push((401, json!({"detail": "Refresh token expired"})));
        let server = TestServer::start(script).await;
        let client = PortalClient::new(&server.url, Duration::from_secs(5)).unwrap();
        let mut session = Session::new(Arc::new(client));

        match handle_line(&mut session, "login sita@example.np secret").await {
            Dispatch::Reply(reply) => assert!(reply.contains("Welcome"), "{}", reply),
            other => panic!("unexpected {:?}", other),
        }
        assert!(session.is_logged_in());

        assert_eq!(
            handle_line(&mut session, "refresh").await,
            Dispatch::Reply("🔒 Your session has expired. Please log in again.".into())
        );
        assert!(!session.is_logged_in());
        assert!(session.state.accounts().is_empty());

        match handle_line(&mut session, "accounts").await {
            Dispatch::Reply(reply) => assert!(reply.contains("log in")),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_error_rendering() {
        assert_eq!(
            render(Err("Card 3 not found".into())),
            Dispatch::Reply("❌ Card 3 not found".into())
        );
        assert_eq!(
            render(Err("❌ Usage: `tx [page]`".into())),
            Dispatch::Reply("❌ Usage: `tx [page]`".into())
        );
    }
}
