use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client as HttpClient, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use super::models::{
    ApiError, CardStatusRequest, ListPayload, LoginRequest, OtpRequest, RefreshRequest,
    RefreshResponse, SecurityAnswerRequest, TokenPair,
};
use crate::api::TransferApi;
use crate::models::{
    Account, Card, CardStatus, InitiateAck, NextOfKin, Profile, SecurityChallenge, Transaction,
    TransferRequest,
};
use crate::utils::rejection_messages;

const LOGIN_PATH: &str = "/v1/auth/login/";
const REFRESH_PATH: &str = "/v1/auth/token/refresh/";
const PROFILE_PATH: &str = "/v1/auth/profile/";
const NEXT_OF_KIN_PATH: &str = "/v1/auth/profile/next-of-kin/";
const ACCOUNTS_PATH: &str = "/v1/accounts/";
const TRANSACTIONS_PATH: &str = "/v1/accounts/transactions/";
const CARDS_PATH: &str = "/v1/cards/";
const INITIATE_TRANSFER_PATH: &str = "/v1/accounts/transfer/initiate/";
const VERIFY_SECURITY_PATH: &str = "/v1/accounts/transfer/verify-security-question/";
const VERIFY_OTP_PATH: &str = "/v1/accounts/transfer/verify-otp/";

/// Banking portal API client.
///
/// Holds the session's token pair. Every authenticated request carries the
/// access token; a 401 triggers one refresh and one retry before the session
/// is reported as expired.
pub struct PortalClient {
    http_client: HttpClient,
    base_url: String,
    tokens: RwLock<Option<TokenPair>>,
}

impl PortalClient {
    /// Create a new client for the API at `base_url`
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let http_client = HttpClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::RequestError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            tokens: RwLock::new(None),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn is_authenticated(&self) -> bool {
        self.tokens.read().await.is_some()
    }

    /// POST /v1/auth/login/
    ///
    /// Stores the returned token pair for subsequent requests.
    pub async fn login(&self, email: &str, password: &str) -> Result<(), ApiError> {
        let body = to_body(&LoginRequest { email, password })?;
        let response = self.dispatch(Method::POST, LOGIN_PATH, Some(&body)).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(match Self::handle_error_response(status, response, Some("login")).await {
                ApiError::SessionExpired => ApiError::Unauthorized("Invalid credentials".into()),
                other => other,
            });
        }

        let payload: Value = read_json(response).await?;
        let tokens: TokenPair = from_envelope(payload, "login")?;
        *self.tokens.write().await = Some(tokens);
        Ok(())
    }

    /// Forget the session tokens. No server call is made.
    pub async fn logout(&self) {
        *self.tokens.write().await = None;
    }

    /// GET /v1/auth/profile/
    pub async fn fetch_profile(&self) -> Result<Profile, ApiError> {
        let payload = self.request(Method::GET, PROFILE_PATH, None, None).await?;
        from_envelope(payload, "profile")
    }

    /// PUT /v1/auth/profile/next-of-kin/
    pub async fn update_next_of_kin(&self, kin: &NextOfKin) -> Result<NextOfKin, ApiError> {
        let body = to_body(kin)?;
        let payload = self
            .request(Method::PUT, NEXT_OF_KIN_PATH, Some(&body), Some("next_of_kin"))
            .await?;
        from_envelope(payload, "next_of_kin")
    }

    /// GET /v1/accounts/
    pub async fn fetch_accounts(&self) -> Result<Vec<Account>, ApiError> {
        let payload = self.request(Method::GET, ACCOUNTS_PATH, None, None).await?;
        from_list(payload)
    }

    /// GET /v1/accounts/transactions/
    pub async fn fetch_transactions(&self) -> Result<Vec<Transaction>, ApiError> {
        let payload = self.request(Method::GET, TRANSACTIONS_PATH, None, None).await?;
        from_list(payload)
    }

    /// GET /v1/cards/
    pub async fn fetch_cards(&self) -> Result<Vec<Card>, ApiError> {
        let payload = self.request(Method::GET, CARDS_PATH, None, None).await?;
        from_list(payload)
    }

    /// PATCH /v1/cards/{id}/
    pub async fn update_card_status(&self, card_id: &str, status: CardStatus) -> Result<Card, ApiError> {
        let path = format!("{}{}/", CARDS_PATH, card_id);
        let body = to_body(&CardStatusRequest { status })?;
        let payload = self.request(Method::PATCH, &path, Some(&body), Some("card")).await?;
        from_envelope(payload, "card")
    }

    /// Create default headers, with the bearer token when a session exists
    async fn create_headers(&self) -> Result<HeaderMap, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(tokens) = self.tokens.read().await.as_ref() {
            let auth_value = HeaderValue::from_str(&format!("Bearer {}", tokens.access))
                .map_err(|e| ApiError::RequestError(format!("Failed to create auth header: {}", e)))?;
            headers.insert(AUTHORIZATION, auth_value);
        }

        Ok(headers)
    }

    async fn dispatch(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<reqwest::Response, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        let headers = self.create_headers().await?;
        debug!("{} {}", method, path);

        let mut builder = self.http_client.request(method, &url).headers(headers);
        if let Some(body) = body {
            builder = builder.json(body);
        }

        builder
            .send()
            .await
            .map_err(|e| ApiError::RequestError(format!("Request failed: {}", e)))
    }

    /// Send an authenticated request and return the JSON payload.
    ///
    /// `envelope` names the key the endpoint wraps its errors in.
    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        envelope: Option<&str>,
    ) -> Result<Value, ApiError> {
        let mut response = self.dispatch(method.clone(), path, body).await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            debug!("Access token rejected on {}, refreshing", path);
            self.refresh_access_token().await?;
            response = self.dispatch(method, path, body).await?;
            if response.status() == StatusCode::UNAUTHORIZED {
                warn!("Request to {} still unauthorized after refresh", path);
                self.logout().await;
                return Err(ApiError::SessionExpired);
            }
        }

        let status = response.status();
        if !status.is_success() {
            return Err(Self::handle_error_response(status, response, envelope).await);
        }

        read_json(response).await
    }

    /// POST /v1/auth/token/refresh/
    async fn refresh_access_token(&self) -> Result<(), ApiError> {
        let refresh = match self.tokens.read().await.as_ref() {
            Some(tokens) => tokens.refresh.clone(),
            None => return Err(ApiError::SessionExpired),
        };

        let url = format!("{}{}", self.base_url, REFRESH_PATH);
        let response = self
            .http_client
            .post(&url)
            .json(&RefreshRequest { refresh: &refresh })
            .send()
            .await
            .map_err(|e| ApiError::RequestError(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            warn!("Token refresh failed with status {}", response.status());
            self.logout().await;
            return Err(ApiError::SessionExpired);
        }

        let refreshed: RefreshResponse = response
            .json()
            .await
            .map_err(|e| ApiError::DeserializationError(format!("Failed to parse refresh response: {}", e)))?;

        let mut tokens = self.tokens.write().await;
        match tokens.as_mut() {
            Some(pair) => {
                pair.access = refreshed.access;
                if let Some(rotated) = refreshed.refresh {
                    pair.refresh = rotated;
                }
                Ok(())
            }
            // logged out while the refresh was in flight
            None => Err(ApiError::SessionExpired),
        }
    }

    /// Parse error response based on HTTP status code
    async fn handle_error_response(
        status: StatusCode,
        response: reqwest::Response,
        envelope: Option<&str>,
    ) -> ApiError {
        let status_code = status.as_u16();
        let body_text = response.text().await.unwrap_or_default();
        let body: Value = serde_json::from_str(&body_text).unwrap_or(Value::Null);
        let messages = rejection_messages(&body, envelope);

        match status_code {
            400 | 403 | 409 | 422 if !messages.is_empty() => {
                warn!("Request rejected ({}): {}", status_code, messages.join("; "));
                ApiError::Rejected(messages)
            }
            401 => ApiError::SessionExpired,
            404 => ApiError::NotFound(body_text),
            500..=599 => {
                warn!("Server error {}: {}", status_code, body_text);
                ApiError::ServerError(status_code, body_text)
            }
            _ => ApiError::HttpError(status_code, body_text),
        }
    }
}

#[async_trait]
impl TransferApi for PortalClient {
    /// POST /v1/accounts/transfer/initiate/
    async fn initiate_transfer(&self, request: &TransferRequest) -> Result<InitiateAck, ApiError> {
        let body = to_body(request)?;
        let payload = self
            .request(Method::POST, INITIATE_TRANSFER_PATH, Some(&body), Some("initiate_transfer"))
            .await?;
        Ok(InitiateAck::from_payload(&payload))
    }

    /// POST /v1/accounts/transfer/verify-security-question/
    async fn verify_security_answer(&self, answer: &str) -> Result<SecurityChallenge, ApiError> {
        let body = to_body(&SecurityAnswerRequest { security_answer: answer })?;
        let payload = self
            .request(Method::POST, VERIFY_SECURITY_PATH, Some(&body), Some("verification_answer"))
            .await?;
        from_envelope(payload, "verification_answer")
    }

    /// POST /v1/accounts/transfer/verify-otp/
    async fn verify_otp(&self, otp: &str) -> Result<Transaction, ApiError> {
        let body = to_body(&OtpRequest { otp })?;
        let payload = self
            .request(Method::POST, VERIFY_OTP_PATH, Some(&body), Some("verify_otp"))
            .await?;
        from_envelope(payload, "verify_otp")
    }
}

fn to_body<T: Serialize + ?Sized>(body: &T) -> Result<Value, ApiError> {
    serde_json::to_value(body)
        .map_err(|e| ApiError::RequestError(format!("Failed to encode request: {}", e)))
}

async fn read_json(response: reqwest::Response) -> Result<Value, ApiError> {
    let text = response
        .text()
        .await
        .map_err(|e| ApiError::RequestError(format!("Failed to read response: {}", e)))?;
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(&text)
        .map_err(|e| ApiError::DeserializationError(format!("Failed to parse response: {}", e)))
}

/// Deserialize `payload[key]` when the payload is wrapped, otherwise the payload itself
fn from_envelope<T: DeserializeOwned>(mut payload: Value, key: &str) -> Result<T, ApiError> {
    let wrapped = payload.get(key).map_or(false, Value::is_object);
    let inner = if wrapped { payload[key].take() } else { payload };
    serde_json::from_value(inner)
        .map_err(|e| ApiError::DeserializationError(format!("Failed to parse {}: {}", key, e)))
}

fn from_list<T: DeserializeOwned>(payload: Value) -> Result<Vec<T>, ApiError> {
    serde_json::from_value::<ListPayload<T>>(payload)
        .map(ListPayload::into_items)
        .map_err(|e| ApiError::DeserializationError(format!("Failed to parse list: {}", e)))
}
