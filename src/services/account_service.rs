use rust_decimal::Decimal;
use std::collections::BTreeMap;

use super::PortalState;
use crate::api::PortalClient;
use crate::utils::{Page, Table};

pub const TRANSACTIONS_PER_PAGE: usize = 10;

/// Reload accounts and transaction history from the server
pub async fn refresh_all(client: &PortalClient, state: &mut PortalState) -> Result<(), String> {
    let accounts = client
        .fetch_accounts()
        .await
        .map_err(|e| format!("Failed to fetch accounts: {}", e))?;
    let transactions = client
        .fetch_transactions()
        .await
        .map_err(|e| format!("Failed to fetch transactions: {}", e))?;

    state.replace_accounts(accounts);
    state.replace_transactions(transactions);
    Ok(())
}

pub fn create_accounts_view(state: &PortalState) -> String {
    if state.accounts().is_empty() {
        return "No accounts found".to_string();
    }

    let mut table = Table::new(&["Account", "Type", "Balance", "Currency", "Status"]).align_right(2);
    for account in state.accounts() {
        table.add_row(vec![
            account.account_number.clone(),
            account.account_type.clone(),
            format!("{:.2}", account.balance),
            account.currency.clone(),
            account.status.clone().unwrap_or_default(),
        ]);
    }
    format!("🏦 Accounts\n{}", table.render())
}

/// Render one page (1-based) of the cached transaction history
pub fn create_transaction_page(state: &PortalState, page: usize) -> Result<String, String> {
    let page = Page::slice(state.transactions(), page, TRANSACTIONS_PER_PAGE)?;
    if page.items.is_empty() {
        return Ok("📋 Transaction History\nNo transactions found".to_string());
    }

    let mut table = Table::new(&["Date", "From", "To", "Amount", "Status", "Description"]).align_right(3);
    for tx in page.items {
        table.add_row(vec![
            tx.date(),
            tx.sender_account.clone(),
            tx.receiver_account.clone(),
            format!("{:.2} {}", tx.amount, tx.currency).trim_end().to_string(),
            tx.status.clone(),
            tx.description.clone().unwrap_or_default(),
        ]);
    }

    let mut footer = page.footer();
    if !page.is_last() {
        footer.push_str(&format!(" · `transactions {}` for older", page.number + 1));
    }
    Ok(format!("📋 Transaction History\n{}\n{}", table.render(), footer))
}

/// Sum of cached balances per currency
pub fn totals_by_currency(state: &PortalState) -> BTreeMap<String, Decimal> {
    let mut totals = BTreeMap::new();
    for account in state.accounts() {
        *totals.entry(account.currency.clone()).or_insert(Decimal::ZERO) += account.balance;
    }
    totals
}
