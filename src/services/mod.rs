pub mod account_service;
pub mod auth_service;
pub mod card_service;
pub mod dashboard_service;
pub mod portal_state;
pub mod profile_service;
pub mod transfer_flow;

pub use portal_state::PortalState;
pub use transfer_flow::{FlowError, OtpProgress, ResendStatus, Stage, TransferFlow};
