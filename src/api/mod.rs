pub mod portal;

use async_trait::async_trait;
use std::sync::Arc;

use crate::models::{InitiateAck, SecurityChallenge, Transaction, TransferRequest};
pub use portal::{ApiError, PortalClient};

/// The three server calls behind the transfer confirmation flow
#[async_trait]
pub trait TransferApi: Send + Sync {
    /// Create a pending transfer for the session
    async fn initiate_transfer(&self, request: &TransferRequest) -> Result<InitiateAck, ApiError>;

    /// Answer the profile's security question; on success an OTP is dispatched
    async fn verify_security_answer(&self, answer: &str) -> Result<SecurityChallenge, ApiError>;

    /// Finalize the pending transfer with the received one-time code
    async fn verify_otp(&self, otp: &str) -> Result<Transaction, ApiError>;
}

#[async_trait]
impl<T: TransferApi + ?Sized> TransferApi for Arc<T> {
    async fn initiate_transfer(&self, request: &TransferRequest) -> Result<InitiateAck, ApiError> {
        (**self).initiate_transfer(request).await
    }

    async fn verify_security_answer(&self, answer: &str) -> Result<SecurityChallenge, ApiError> {
        (**self).verify_security_answer(answer).await
    }

    async fn verify_otp(&self, otp: &str) -> Result<Transaction, ApiError> {
        (**self).verify_otp(otp).await
    }
}
