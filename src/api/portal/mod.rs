pub mod client;
pub mod models;
#[cfg(test)]
pub mod test_server;

pub use client::PortalClient;
pub use models::ApiError;
