use crate::models::CardStatus;
use crate::services::card_service;
use crate::session::Session;

pub fn execute(session: &Session) -> Result<String, String> {
    Ok(card_service::create_cards_view(&session.state))
}

pub async fn update(session: &mut Session, args: &[&str]) -> Result<String, String> {
    let (status, card_id) = match args {
        ["block", id] => (CardStatus::Blocked, *id),
        ["unblock", id] => (CardStatus::Active, *id),
        _ => return Err("❌ Usage: `card block <id>` or `card unblock <id>`".to_string()),
    };

    let card = card_service::set_card_status(&session.client, &mut session.state, card_id, status).await?;
    let verb = if card.status == CardStatus::Blocked {
        "🔒 Blocked"
    } else {
        "🔓 Unblocked"
    };
    Ok(format!("{} card ending {}", verb, card.last_four()))
}
