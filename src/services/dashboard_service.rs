//! Role-based dashboard
//!
//! Customers get their balances, latest transactions and cards. Staff and
//! admins additionally get an overview of the cached accounts.

use std::collections::BTreeMap;

use super::{account_service, card_service, PortalState};
use crate::models::Role;
use crate::utils::Table;

const RECENT_TRANSACTIONS: usize = 5;

pub fn create_dashboard(state: &PortalState) -> Result<String, String> {
    let profile = state.profile().ok_or("Please log in first".to_string())?;

    let mut sections = vec![format!(
        "📊 Dashboard for {} ({})",
        profile.full_name(),
        profile.role.name()
    )];
    sections.push(account_service::create_accounts_view(state));
    sections.push(recent_transactions(state));
    sections.push(card_service::create_cards_view(state));

    if profile.role.is_staff() {
        sections.push(account_overview(state, profile.role));
    }

    Ok(sections.join("\n\n"))
}

fn recent_transactions(state: &PortalState) -> String {
    let recent = &state.transactions()[..state.transactions().len().min(RECENT_TRANSACTIONS)];
    if recent.is_empty() {
        return "🕑 Recent transactions\nNone yet".to_string();
    }

    let mut table = Table::new(&["From", "To", "Amount", "Status"]).align_right(2);
    for tx in recent {
        table.add_row(vec![
            tx.sender_account.clone(),
            tx.receiver_account.clone(),
            format!("{:.2}", tx.amount),
            tx.status.clone(),
        ]);
    }
    format!("🕑 Recent transactions\n{}", table.render())
}

fn account_overview(state: &PortalState, role: Role) -> String {
    let mut by_type: BTreeMap<&str, usize> = BTreeMap::new();
    for account in state.accounts() {
        let kind = if account.account_type.is_empty() {
            "unspecified"
        } else {
            account.account_type.as_str()
        };
        *by_type.entry(kind).or_insert(0) += 1;
    }

    let mut table = Table::new(&["Currency", "Total balance"]).align_right(1);
    for (currency, total) in account_service::totals_by_currency(state) {
        table.add_row(vec![currency, format!("{:.2}", total)]);
    }

    let counts: Vec<String> = by_type
        .iter()
        .map(|(kind, count)| format!("{}: {}", kind, count))
        .collect();

    format!(
        "🛠 Account overview ({} view)\n{}\nAccounts by type: {}",
        role.name(),
        table.render(),
        if counts.is_empty() {
            "none".to_string()
        } else {
            counts.join(", ")
        }
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Account, Profile};
    use rust_decimal::Decimal;

    fn state_for(role: Role) -> PortalState {
        let mut state = PortalState::default();
        state.set_profile(Profile {
            email: "hari@example.np".into(),
            first_name: "Hari".into(),
            last_name: String::new(),
            role,
            security_question: None,
            next_of_kin: None,
        });
        state.replace_accounts(vec![
            Account {
                account_number: "1111222233".into(),
                account_type: "savings".into(),
                balance: Decimal::new(1000, 0),
                currency: "NPR".into(),
                status: None,
            },
            Account {
                account_number: "4444555566".into(),
                account_type: "savings".into(),
                balance: Decimal::new(250, 0),
                currency: "NPR".into(),
                status: None,
            },
        ]);
        state
    }

    #[test]
    fn test_customer_dashboard() {
        let dashboard = create_dashboard(&state_for(Role::Customer)).unwrap();

        assert!(dashboard.contains("Dashboard for Hari (customer)"));
        assert!(dashboard.contains("1111222233"));
        assert!(dashboard.contains("None yet"));
        assert!(!dashboard.contains("Account overview"));
    }

    #[test]
    fn test_staff_dashboard_has_overview() {
        let dashboard = create_dashboard(&state_for(Role::Staff)).unwrap();

        assert!(dashboard.contains("Account overview (staff view)"));
        assert!(dashboard.contains("1250.00"));
        assert!(dashboard.contains("savings: 2"));
    }

    #[test]
    fn test_requires_login() {
        assert!(create_dashboard(&PortalState::default()).is_err());
    }
}
