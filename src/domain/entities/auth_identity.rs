use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;

use crate::domain::error::EntityError;
use crate::domain::json::Fields;

/// Authenticated identity as reported by the identity provider.
///
/// Built from the provider's snake_case shape (`access_token`,
/// `refresh_token`, `created_at`). Never mutated or deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthIdentity {
    id: String,
    email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    lastname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    access_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    refresh_token: Option<String>,
    created_at: DateTime<Utc>,
}

impl AuthIdentity {
    pub const NAME: &'static str = "AuthIdentity";

    /// Rebuild from the provider shape. Only `id` and `email` are required;
    /// a missing `created_at` defaults to now.
    pub fn from_json(json: &Value) -> Result<Self, EntityError> {
        let fields = Fields::new(Self::NAME, json);

        Ok(Self {
            id: fields.required("id")?,
            email: fields.required("email")?,
            name: fields.optional("name"),
            lastname: fields.optional("lastname"),
            access_token: fields.optional("access_token"),
            refresh_token: fields.optional("refresh_token"),
            created_at: fields.optional_date("created_at")?.unwrap_or_else(Utc::now),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn lastname(&self) -> Option<&str> {
        self.lastname.as_deref()
    }

    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
