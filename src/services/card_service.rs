use tracing::info;

use super::PortalState;
use crate::api::{ApiError, PortalClient};
use crate::models::{Card, CardStatus};
use crate::utils::Table;

pub async fn refresh_cards(client: &PortalClient, state: &mut PortalState) -> Result<(), String> {
    let cards = client
        .fetch_cards()
        .await
        .map_err(|e| format!("Failed to fetch cards: {}", e))?;
    state.replace_cards(cards);
    Ok(())
}

/// Block or unblock one of the customer's cards
pub async fn set_card_status(
    client: &PortalClient,
    state: &mut PortalState,
    card_id: &str,
    status: CardStatus,
) -> Result<Card, String> {
    let current = state
        .cards()
        .iter()
        .find(|c| c.id == card_id)
        .ok_or_else(|| format!("Card {} not found", card_id))?;

    if current.status == status {
        return Err(format!("Card ending {} is already {}", current.last_four(), status));
    }
    if current.status == CardStatus::Expired {
        return Err(format!("Card ending {} has expired", current.last_four()));
    }

    let updated = client
        .update_card_status(card_id, status)
        .await
        .map_err(|e| match e {
            ApiError::Rejected(messages) => messages.join(" "),
            other => format!("Failed to update card: {}", other),
        })?;

    info!("Card {} is now {}", updated.id, updated.status);
    state.replace_card(updated.clone());
    Ok(updated)
}

pub fn create_cards_view(state: &PortalState) -> String {
    if state.cards().is_empty() {
        return "No cards found".to_string();
    }

    let mut table = Table::new(&["Id", "Card", "Type", "Status", "Expires"]);
    for card in state.cards() {
        table.add_row(vec![
            card.id.clone(),
            format!("•••• {}", card.last_four()),
            card.card_type.clone(),
            card.status.to_string(),
            card.expiry_date.clone().unwrap_or_default(),
        ]);
    }
    format!("💳 Cards\n{}", table.render())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cards_view() {
        let mut state = PortalState::default();
        assert_eq!(create_cards_view(&state), "No cards found");

        state.replace_cards(vec![Card {
            id: "7".into(),
            card_number: "4111 **** **** 1111".into(),
            card_type: "debit".into(),
            status: CardStatus::Blocked,
            expiry_date: Some("09/28".into()),
        }]);
        let view = create_cards_view(&state);
        assert!(view.contains("•••• 1111"));
        assert!(view.contains("blocked"));
        assert!(view.contains("09/28"));
    }
}
