use crate::services::account_service;
use crate::session::Session;

pub fn execute(session: &Session, args: &[&str]) -> Result<String, String> {
    let page = match args.first() {
        None => 1,
        Some(raw) => raw
            .parse::<usize>()
            .map_err(|_| "❌ Usage: `transactions [page]`".to_string())?,
    };

    account_service::create_transaction_page(&session.state, page)
}
