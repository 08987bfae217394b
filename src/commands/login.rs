use crate::services::auth_service;
use crate::session::Session;

pub async fn execute(session: &mut Session, args: &[&str]) -> Result<String, String> {
    if args.len() < 2 {
        return Err("❌ Usage: `login <email> <password>`".to_string());
    }

    let email = args[0];
    let password = args[1..].join(" ");
    // a new login abandons whatever the previous session had in progress
    session.flow.reset();
    let profile = auth_service::login(&session.client, &mut session.state, email, &password).await?;

    Ok(format!(
        "👋 Welcome, {}! You have {} account(s). Type `dashboard` for an overview.",
        profile.full_name(),
        session.state.accounts().len()
    ))
}

pub async fn logout(session: &mut Session) -> Result<String, String> {
    auth_service::logout(&session.client, &mut session.state).await;
    session.end();
    Ok("👋 Logged out".to_string())
}
