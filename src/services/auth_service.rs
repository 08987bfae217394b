use tracing::info;

use super::{account_service, card_service, PortalState};
use crate::api::{ApiError, PortalClient};
use crate::models::Profile;

/// Log in and load the session's profile, accounts, history and cards
pub async fn login(
    client: &PortalClient,
    state: &mut PortalState,
    email: &str,
    password: &str,
) -> Result<Profile, String> {
    client.login(email, password).await.map_err(|e| match e {
        ApiError::Unauthorized(_) => "Invalid email or password".to_string(),
        ApiError::Rejected(messages) => messages.join(" "),
        other => format!("Login failed: {}", other),
    })?;

    state.clear();
    // tokens and cache are kept only for a fully loaded session
    let profile = match load_session(client, state).await {
        Ok(profile) => profile,
        Err(e) => {
            client.logout().await;
            state.clear();
            return Err(e);
        }
    };

    info!(
        "Logged in to {} as {} ({})",
        client.base_url(),
        profile.email,
        profile.role.name()
    );
    Ok(profile)
}

async fn load_session(client: &PortalClient, state: &mut PortalState) -> Result<Profile, String> {
    let profile = client
        .fetch_profile()
        .await
        .map_err(|e| format!("Failed to load profile: {}", e))?;
    state.set_profile(profile.clone());

    account_service::refresh_all(client, state).await?;
    card_service::refresh_cards(client, state).await?;
    Ok(profile)
}

/// Drop the session locally; the server-side tokens simply expire
pub async fn logout(client: &PortalClient, state: &mut PortalState) {
    if client.is_authenticated().await {
        client.logout().await;
        info!("Logged out");
    }
    state.clear();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::portal::test_server::{login_script, TestServer};
    use serde_json::json;
    use std::time::Duration;

    async fn client_for(script: Vec<(u16, serde_json::Value)>) -> (PortalClient, TestServer) {
        let server = TestServer::start(script).await;
        let client = PortalClient::new(&server.url, Duration::from_secs(5)).unwrap();
        (client, server)
    }

    #[tokio::test]
    async fn test_login_loads_everything() {
        let (client, server) = client_for(login_script()).await;
        let mut state = PortalState::default();

        let profile = login(&client, &mut state, "sita@example.np", "secret").await.unwrap();
        assert_eq!(profile.full_name(), "Sita");
        assert_eq!(state.accounts().len(), 1);
        assert!(client.is_authenticated().await);
        assert_eq!(server.requests().len(), 5);
    }

    #[tokio::test]
    async fn test_profile_failure_rolls_back() {
        let (client, _server) = client_for(vec![
            (200, json!({"access": "access-1", "refresh": "refresh-1"})),
            (500, json!({"detail": "boom"})),
        ])
        .await;
        let mut state = PortalState::default();

        assert!(login(&client, &mut state, "sita@example.np", "secret").await.is_err());
        assert!(!client.is_authenticated().await);
        assert!(state.profile().is_none());
    }

    #[tokio::test]
    async fn test_account_failure_rolls_back() {
        let (client, _server) = client_for(vec![
            (200, json!({"access": "access-1", "refresh": "refresh-1"})),
            (200, json!({"email": "sita@example.np"})),
            (500, json!({"detail": "boom"})),
        ])
        .await;
        let mut state = PortalState::default();

        let err = login(&client, &mut state, "sita@example.np", "secret").await.unwrap_err();
        assert!(err.contains("Failed to fetch accounts"));
        assert!(!client.is_authenticated().await);
        assert!(state.profile().is_none());
        assert!(state.accounts().is_empty());
    }
}
