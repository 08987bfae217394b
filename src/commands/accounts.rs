use crate::services::{account_service, card_service};
use crate::session::Session;

pub fn execute(session: &Session) -> Result<String, String> {
    Ok(account_service::create_accounts_view(&session.state))
}

pub async fn refresh(session: &mut Session) -> Result<String, String> {
    account_service::refresh_all(&session.client, &mut session.state).await?;
    card_service::refresh_cards(&session.client, &mut session.state).await?;
    Ok(format!(
        "🔄 Refreshed {} account(s), {} transaction(s) and {} card(s)",
        session.state.accounts().len(),
        session.state.transactions().len(),
        session.state.cards().len()
    ))
}
