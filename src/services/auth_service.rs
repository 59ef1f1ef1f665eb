//! Authentication service - registration, sessions and bearer tokens.
//!
//! Credentials are owned by the identity provider; this service composes it
//! with profile creation and verifies the JWTs the provider issues.

use std::sync::Arc;

use async_trait::async_trait;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use super::crud::CrudService;
use crate::config::Config;
use crate::domain::{
    AuthIdentity, CreateUserDto, Dto, LoginDto, LogoutDto, RegisterDto, UpdateUserDto, User,
};
use crate::errors::{AppError, AppResult};
use crate::infra::IdentityProvider;

/// Profile use cases as seen by the auth service.
pub type DynUserService =
    Arc<dyn CrudService<Entity = User, Create = CreateUserDto, Update = UpdateUserDto>>;

/// JWT claims payload issued by the identity provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    pub exp: i64,
    #[serde(default)]
    pub iat: Option<i64>,
}

/// Result of a successful registration
#[derive(Debug, Serialize, ToSchema)]
pub struct Registration {
    pub identity: AuthIdentity,
    pub user: User,
}

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Register an identity and create its profile
    async fn register(&self, dto: RegisterDto) -> AppResult<Registration>;

    /// Password login
    async fn login(&self, dto: LoginDto) -> AppResult<AuthIdentity>;

    /// End every session of the token's owner
    async fn logout(&self, dto: LogoutDto) -> AppResult<()>;

    /// Verify a bearer token and extract its claims
    fn verify_token(&self, token: &str) -> AppResult<Claims>;
}

/// Concrete implementation of AuthService.
pub struct Authenticator {
    identity: Arc<dyn IdentityProvider>,
    users: DynUserService,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl Authenticator {
    pub fn new(identity: Arc<dyn IdentityProvider>, users: DynUserService, config: &Config) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Provider tokens carry `aud: authenticated`
        validation.validate_aud = false;

        Self {
            identity,
            users,
            decoding_key: DecodingKey::from_secret(config.jwt_secret_bytes()),
            validation,
        }
    }
}

#[async_trait]
impl AuthService for Authenticator {
    #[tracing::instrument(skip_all)]
    async fn register(&self, dto: RegisterDto) -> AppResult<Registration> {
        let identity = self.identity.register(&dto).await?;

        let profile = CreateUserDto::create(&json!({
            "authId": identity.id(),
            "name": dto.name(),
            "lastname": dto.lastname(),
        }))
        .map_err(|_| AppError::internal("identity provider returned an unusable identity"))?;

        let user = self.users.create(profile).await?;
        tracing::info!(auth_id = identity.id(), user_id = user.id(), "Registered new user");

        Ok(Registration { identity, user })
    }

    #[tracing::instrument(skip_all)]
    async fn login(&self, dto: LoginDto) -> AppResult<AuthIdentity> {
        self.identity.login(&dto).await
    }

    #[tracing::instrument(skip_all)]
    async fn logout(&self, dto: LogoutDto) -> AppResult<()> {
        self.identity.logout(&dto).await
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::Value;

    use super::*;
    use crate::infra::identity::MockIdentityProvider;
    use crate::infra::repositories::{MockRecordStore, UserResource};
    use crate::services::CrudManager;

    const SECRET: &str = "test-secret-key-minimum-32-chars!!";

    fn config() -> Config {
        Config::from_lookup(|name| match name {
            "JWT_SECRET" => Some(SECRET.to_string()),
            "SUPABASE_URL" => Some("http://localhost:54321".to_string()),
            "SUPABASE_KEY" => Some("anon".to_string()),
            "CRYPTO_SECRET" => Some("11".repeat(32)),
            "CRYPTO_IV" => Some("22".repeat(16)),
            _ => None,
        })
        .unwrap()
    }

    fn identity() -> AuthIdentity {
        AuthIdentity::from_json(&json!({
            "id": "auth-1",
            "email": "a@b.com",
            "name": "Ana",
            "lastname": "Diaz",
            "access_token": "access",
        }))
        .unwrap()
    }

    fn authenticator(provider: MockIdentityProvider, store: MockRecordStore) -> Authenticator {
        let users = Arc::new(CrudManager::new(UserResource, Arc::new(store)));
        Authenticator::new(Arc::new(provider), users, &config())
    }

    fn token(secret: &str, exp: i64) -> String {
        let claims = json!({
            "sub": "auth-1",
            "email": "a@b.com",
            "role": "authenticated",
            "aud": "authenticated",
            "exp": exp,
        });
        encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes())).unwrap()
    }

    #[tokio::test]
    async fn register_creates_profile_for_identity() {
        let mut provider = MockIdentityProvider::new();
        provider
            .expect_register()
            .times(1)
            .returning(|_| Ok(identity()));

        let mut store = MockRecordStore::new();
        store
            .expect_insert()
            .withf(|record| {
                Value::Object(record.clone())
                    == json!({"authId": "auth-1", "name": "Ana", "lastname": "Diaz"})
            })
            .returning(|mut record| {
                record.insert("id".into(), json!("user-1"));
                record.insert("createdAt".into(), json!("2024-01-01T00:00:00Z"));
                record.insert("updatedAt".into(), json!("2024-01-01T00:00:00Z"));
                record.insert("deleted".into(), json!(false));
                Ok(record)
            });

        let dto = RegisterDto::create(&json!({
            "email": "a@b.com",
            "password": "secret1",
            "name": "Ana",
            "lastname": "Diaz",
        }))
        .unwrap();
        let registration = authenticator(provider, store).register(dto).await.unwrap();

        assert_eq!(registration.identity.id(), "auth-1");
        assert_eq!(registration.user.auth_id(), "auth-1");
        assert_eq!(registration.user.id(), "user-1");
    }

    #[tokio::test]
    async fn register_stops_when_provider_rejects() {
        let mut provider = MockIdentityProvider::new();
        provider
            .expect_register()
            .returning(|_| Err(AppError::identity("User already registered")));

        let mut store = MockRecordStore::new();
        store.expect_insert().never();

        let dto = RegisterDto::create(&json!({
            "email": "a@b.com",
            "password": "secret1",
            "name": "Ana",
            "lastname": "Diaz",
        }))
        .unwrap();
        let err = authenticator(provider, store).register(dto).await.unwrap_err();
        assert!(matches!(err, AppError::Identity(_)));
    }

    #[tokio::test]
    async fn login_returns_provider_identity() {
        let mut provider = MockIdentityProvider::new();
        provider
            .expect_login()
            .withf(|dto| dto.email() == "a@b.com")
            .returning(|_| Ok(identity()));

        let dto = LoginDto::create(&json!({"email": "a@b.com", "password": "secret1"})).unwrap();
        let identity = authenticator(provider, MockRecordStore::new())
            .login(dto)
            .await
            .unwrap();
        assert_eq!(identity.access_token(), Some("access"));
    }

    #[tokio::test]
    async fn logout_delegates_token() {
        let mut provider = MockIdentityProvider::new();
        provider
            .expect_logout()
            .withf(|dto| dto.access_token() == "access")
            .times(1)
            .returning(|_| Ok(()));

        let dto = LogoutDto::create(&json!({"accessToken": "access"})).unwrap();
        tokio_test::assert_ok!(
            authenticator(provider, MockRecordStore::new())
                .logout(dto)
                .await
        );
    }

    #[test]
    fn verify_token_accepts_provider_tokens() {
        let auth = authenticator(MockIdentityProvider::new(), MockRecordStore::new());
        let exp = (Utc::now() + Duration::hours(1)).timestamp();

        let claims = auth.verify_token(&token(SECRET, exp)).unwrap();
        assert_eq!(claims.sub, "auth-1");
        assert_eq!(claims.role.as_deref(), Some("authenticated"));
    }

    #[test]
    fn verify_token_rejects_bad_signature_and_expiry() {
        let auth = authenticator(MockIdentityProvider::new(), MockRecordStore::new());
        let exp = (Utc::now() + Duration::hours(1)).timestamp();
        let expired = (Utc::now() - Duration::hours(1)).timestamp();

        tokio_test::assert_err!(auth.verify_token(&token("another-secret-that-is-long-enough!", exp)));
        tokio_test::assert_err!(auth.verify_token(&token(SECRET, expired)));
        assert!(matches!(auth.verify_token("garbage"), Err(AppError::Jwt(_))));
    }
}
