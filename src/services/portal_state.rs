//! Session-scoped application state
//!
//! Holds the client-side copies of the customer's profile, accounts,
//! transactions and cards. The state is owned by the session and handed to
//! services and views by reference; each server response is applied as one
//! synchronous replace.

use rust_decimal::Decimal;

use crate::models::{Account, Card, Profile, Transaction};

#[derive(Debug, Default, Clone)]
pub struct PortalState {
    profile: Option<Profile>,
    accounts: Vec<Account>,
    transactions: Vec<Transaction>,
    cards: Vec<Card>,
}

impl PortalState {
    pub fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref()
    }

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn account(&self, account_number: &str) -> Option<&Account> {
        self.accounts
            .iter()
            .find(|a| a.account_number == account_number)
    }

    pub fn balance_of(&self, account_number: &str) -> Option<Decimal> {
        self.account(account_number).map(|a| a.balance)
    }

    pub fn set_profile(&mut self, profile: Profile) {
        self.profile = Some(profile);
    }

    pub fn replace_accounts(&mut self, accounts: Vec<Account>) {
        self.accounts = accounts;
    }

    pub fn replace_transactions(&mut self, transactions: Vec<Transaction>) {
        self.transactions = transactions;
    }

    pub fn replace_cards(&mut self, cards: Vec<Card>) {
        self.cards = cards;
    }

    /// Swap a single card for its updated copy, matched by id
    pub fn replace_card(&mut self, card: Card) {
        let cards = self
            .cards
            .iter()
            .map(|c| if c.id == card.id { card.clone() } else { c.clone() })
            .collect();
        self.cards = cards;
    }

    /// Mirror a settled transfer into the local caches.
    ///
    /// The transaction goes to the front of the history; the sender account
    /// loses `amount` and the receiver account gains it. Accounts missing from
    /// the cache are left alone. Returns how many balances changed.
    pub fn apply_settled_transfer(&mut self, settled: &Transaction) -> usize {
        let mut changed = 0;
        let mut accounts = self.accounts.clone();
        for account in accounts.iter_mut() {
            if account.account_number == settled.sender_account {
                account.balance -= settled.amount;
                changed += 1;
            } else if account.account_number == settled.receiver_account {
                account.balance += settled.amount;
                changed += 1;
            }
        }

        let mut transactions = Vec::with_capacity(self.transactions.len() + 1);
        transactions.push(settled.clone());
        transactions.extend(self.transactions.iter().cloned());

        self.accounts = accounts;
        self.transactions = transactions;
        changed
    }

    pub fn clear(&mut self) {
        *self = PortalState::default();
    }
}
