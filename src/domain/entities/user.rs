use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;

use crate::domain::error::EntityError;
use crate::domain::json::Fields;

/// Application-side user profile, linked to an identity via `authId`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    id: String,
    auth_id: String,
    name: String,
    lastname: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    deleted_at: Option<DateTime<Utc>>,
}

impl User {
    pub const NAME: &'static str = "User";

    pub fn from_json(json: &Value) -> Result<Self, EntityError> {
        let fields = Fields::new(Self::NAME, json);

        Ok(Self {
            id: fields.required("id")?,
            auth_id: fields.required("authId")?,
            name: fields.required("name")?,
            lastname: fields.required("lastname")?,
            created_at: fields.required_date("createdAt")?,
            updated_at: fields.required_date("updatedAt")?,
            deleted: fields.flag("deleted"),
            deleted_at: fields.optional_date("deletedAt")?,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn auth_id(&self) -> &str {
        &self.auth_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn lastname(&self) -> &str {
        &self.lastname
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted
    }

    pub fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn record() -> Value {
        json!({
            "id": "1",
            "authId": "a",
            "name": "J",
            "lastname": "D",
            "createdAt": "2024-01-01T00:00:00Z",
            "updatedAt": "2024-01-02T00:00:00Z",
        })
    }

    #[test]
    fn builds_active_user_with_defaults() {
        let user = User::from_json(&record()).unwrap();

        assert_eq!(user.id(), "1");
        assert_eq!(user.auth_id(), "a");
        assert!(!user.is_deleted());
        assert_eq!(user.deleted_at(), None);
        assert!(user.updated_at() > user.created_at());
    }

    #[test]
    fn invalid_created_at_is_malformed() {
        let err = User::from_json(&json!({
            "id": "1",
            "name": "J",
            "lastname": "D",
            "authId": "a",
            "createdAt": "not-a-date",
        }))
        .unwrap_err();

        assert_eq!(
            err,
            EntityError::InvalidDate {
                entity: User::NAME,
                field: "createdAt"
            }
        );
    }

    #[test]
    fn missing_updated_at_is_malformed() {
        let mut json = record();
        json.as_object_mut().unwrap().remove("updatedAt");

        let err = User::from_json(&json).unwrap_err();
        assert_eq!(err.field(), "updatedAt");
    }

    #[test]
    fn soft_deleted_user_keeps_deletion_time() {
        let mut json = record();
        json["deleted"] = json!(true);
        json["deletedAt"] = json!("2024-02-01T12:30:00Z");

        let user = User::from_json(&json).unwrap();
        assert!(user.is_deleted());
        assert_eq!(
            user.deleted_at().map(|d| d.to_rfc3339()),
            Some("2024-02-01T12:30:00+00:00".to_string())
        );
    }

    #[test]
    fn invalid_deleted_at_is_malformed() {
        let mut json = record();
        json["deletedAt"] = json!("invalid-date");

        assert!(matches!(
            User::from_json(&json),
            Err(EntityError::InvalidDate { field: "deletedAt", .. })
        ));
    }

    #[test]
    fn serializes_camel_case() {
        let value = serde_json::to_value(User::from_json(&record()).unwrap()).unwrap();
        assert_eq!(value["authId"], "a");
        assert_eq!(value["deleted"], false);
        assert!(value.get("deletedAt").is_none());
    }
}
