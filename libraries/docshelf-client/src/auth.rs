//! Authentication flows for the Docshelf API.

use crate::client::{DocshelfClient, RequestBody, RequestOptions};
use crate::error::{ClientError, Result};
use crate::types::UserProfile;
use reqwest::Method;
use serde_json::{json, Value};
use tracing::{debug, info};

/// Authentication client for the Docshelf API.
pub struct AuthClient<'a> {
    client: &'a DocshelfClient,
}

impl<'a> AuthClient<'a> {
    pub(crate) fn new(client: &'a DocshelfClient) -> Self {
        Self { client }
    }

    /// Login with username and password.
    ///
    /// The login route takes a URL-encoded form body and replies with a
    /// bare token payload. On success the token is persisted to the
    /// token store and returned; a reply without a token persists
    /// nothing.
    pub async fn login(&self, username: &str, password: &str) -> Result<String> {
        debug!(username = %username, "Attempting login");

        let body = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("username", username)
            .append_pair("password", password)
            .finish();

        let options = RequestOptions::new(Method::POST)
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(RequestBody::Raw(body));

        let payload = self.client.dispatch("/auth/login", options).await?;

        let token = payload
            .get("access_token")
            .and_then(Value::as_str)
            .or_else(|| payload.get("token").and_then(Value::as_str))
            .ok_or(ClientError::MissingAccessToken)?;

        self.client.store().set(token).await?;
        info!(username = %username, "Login successful");

        Ok(token.to_string())
    }

    /// Create a new user account.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<UserProfile> {
        debug!(username = %username, "Registering user");

        let options = RequestOptions::new(Method::POST).json(json!({
            "username": username,
            "email": email,
            "password": password,
        }));

        let payload = self.client.dispatch("/users/", options).await?;
        let profile: UserProfile = serde_json::from_value(payload)
            .map_err(|e| ClientError::ParseError(format!("Failed to parse user profile: {}", e)))?;

        info!(user_id = profile.id, username = %profile.username, "User registered");
        Ok(profile)
    }

    /// Fetch the profile behind the current session token.
    pub async fn me(&self) -> Result<UserProfile> {
        let payload = self
            .client
            .dispatch("/users/me", RequestOptions::default())
            .await?;

        serde_json::from_value(payload)
            .map_err(|e| ClientError::ParseError(format!("Failed to parse user profile: {}", e)))
    }

    /// End the current session by clearing the stored token.
    ///
    /// The server keeps no session state, so this is purely local.
    pub async fn logout(&self) -> Result<()> {
        self.client.store().clear().await?;
        info!("Logged out");
        Ok(())
    }
}
