//! Identity provider adapter.
//!
//! Credentials and sessions live in an external GoTrue-compatible service
//! (Supabase Auth). This module only translates between its HTTP API and
//! [`AuthIdentity`].

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::config::{
    Config, IDENTITY_API_KEY_HEADER, IDENTITY_LOGOUT_PATH, IDENTITY_SIGNUP_PATH,
    IDENTITY_TOKEN_PATH,
};
use crate::domain::{AuthIdentity, LoginDto, LogoutDto, RegisterDto};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// External identity operations.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Create a new identity
    async fn register(&self, dto: &RegisterDto) -> AppResult<AuthIdentity>;

    /// Password login, returning the identity with session tokens
    async fn login(&self, dto: &LoginDto) -> AppResult<AuthIdentity>;

    /// Revoke every session of the token's owner
    async fn logout(&self, dto: &LogoutDto) -> AppResult<()>;
}

#[derive(Debug, Deserialize)]
struct ProviderUser {
    id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    user_metadata: Value,
    #[serde(default)]
    created_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProviderSession {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    user: ProviderUser,
}

/// Sign-up answers with a session, or with a bare user when email
/// confirmation is pending.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SignUpResponse {
    Session(ProviderSession),
    User(ProviderUser),
}

impl ProviderUser {
    fn metadata(&self, key: &str) -> Value {
        self.user_metadata.get(key).cloned().unwrap_or(Value::Null)
    }

    /// Provider shape consumed by [`AuthIdentity::from_json`].
    fn identity_json(&self, session: Option<&ProviderSession>) -> Value {
        json!({
            "id": self.id,
            "email": self.email,
            "name": self.metadata("name"),
            "lastname": self.metadata("lastname"),
            "access_token": session.map(|s| s.access_token.as_str()),
            "refresh_token": session.and_then(|s| s.refresh_token.as_deref()),
            "created_at": self.created_at,
        })
    }
}

fn session_identity(session: &ProviderSession) -> AppResult<AuthIdentity> {
    Ok(AuthIdentity::from_json(
        &session.user.identity_json(Some(session)),
    )?)
}

/// Pull a human-readable message out of a provider error body.
fn error_message(body: &Value) -> Option<String> {
    ["msg", "error_description", "message", "error"]
        .iter()
        .find_map(|key| body.get(*key).and_then(Value::as_str))
        .map(str::to_string)
}

/// Supabase Auth over HTTP.
#[derive(Clone)]
pub struct SupabaseIdentity {
    client: Client,
    base_url: String,
    api_key: String,
}

impl SupabaseIdentity {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.identity_url.clone(), config.identity_key())
    }

    fn post(&self, path: &str) -> RequestBuilder {
        self.client
            .post(format!("{}{}", self.base_url, path))
            .header(IDENTITY_API_KEY_HEADER, &self.api_key)
    }

    async fn send(&self, request: RequestBuilder) -> AppResult<Response> {
        let response = request.send().await.map_err(|e| {
            AppError::internal(format!("identity provider unreachable: {}", e))
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body: Value = response.json().await.unwrap_or(Value::Null);
        let message = error_message(&body).unwrap_or_else(|| status.to_string());
        tracing::debug!(%status, %message, "Identity provider rejected request");
        Err(AppError::identity(message))
    }

    async fn read<T: for<'de> Deserialize<'de>>(response: Response) -> AppResult<T> {
        response
            .json()
            .await
            .map_err(|e| AppError::internal(format!("unexpected identity provider response: {}", e)))
    }
}

#[async_trait]
impl IdentityProvider for SupabaseIdentity {
    async fn register(&self, dto: &RegisterDto) -> AppResult<AuthIdentity> {
        let request = self.post(IDENTITY_SIGNUP_PATH).json(&json!({
            "email": dto.email(),
            "password": dto.password(),
            "data": {
                "name": dto.name(),
                "lastname": dto.lastname(),
            },
        }));

        let response = self.send(request).await?;
        match Self::read::<SignUpResponse>(response).await? {
            SignUpResponse::Session(session) => session_identity(&session),
            SignUpResponse::User(user) => Ok(AuthIdentity::from_json(&user.identity_json(None))?),
        }
    }

    async fn login(&self, dto: &LoginDto) -> AppResult<AuthIdentity> {
        let request = self.post(IDENTITY_TOKEN_PATH).json(&json!({
            "email": dto.email(),
            "password": dto.password(),
        }));

        let response = self.send(request).await?;
        let session = Self::read::<ProviderSession>(response).await?;
        session_identity(&session)
    }

    async fn logout(&self, dto: &LogoutDto) -> AppResult<()> {
        let request = self.post(IDENTITY_LOGOUT_PATH).bearer_auth(dto.access_token());
        self.send(request).await?;
        Ok(())
    }
}
