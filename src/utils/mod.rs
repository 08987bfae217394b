pub mod countdown;
pub mod errors;
pub mod page;
pub mod table;

pub use countdown::{format_remaining, Countdown, Notice};
pub use errors::rejection_messages;
pub use page::Page;
pub use table::Table;
