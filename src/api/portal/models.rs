use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::CardStatus;

/// Request body for the login endpoint
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Token pair returned by login
#[derive(Debug, Clone, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RefreshRequest<'a> {
    pub refresh: &'a str,
}

/// Refresh response; the server may rotate the refresh token as well
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshResponse {
    pub access: String,
    #[serde(default)]
    pub refresh: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SecurityAnswerRequest<'a> {
    pub security_answer: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct OtpRequest<'a> {
    pub otp: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct CardStatusRequest {
    pub status: CardStatus,
}

/// List endpoints return either a bare array or a paginated envelope
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ListPayload<T> {
    Paged { results: Vec<T> },
    Bare(Vec<T>),
}

impl<T> ListPayload<T> {
    pub fn into_items(self) -> Vec<T> {
        match self {
            ListPayload::Paged { results } => results,
            ListPayload::Bare(items) => items,
        }
    }
}

/// Error type for portal API operations
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// The server refused the request; messages are ready to show to the user
    #[error("Rejected: {}", .0.join("; "))]
    Rejected(Vec<String>),
    /// 401 on a request made without a session
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    /// 401 persisted after a token refresh, or the refresh itself failed
    #[error("Session expired")]
    SessionExpired,
    #[error("Not Found: {0}")]
    NotFound(String),
    #[error("Server Error ({0}): {1}")]
    ServerError(u16, String),
    #[error("HTTP Error ({0}): {1}")]
    HttpError(u16, String),
    /// Network/request error
    #[error("Request Error: {0}")]
    RequestError(String),
    #[error("Deserialization Error: {0}")]
    DeserializationError(String),
}
