use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;

use crate::domain::error::EntityError;
use crate::domain::json::Fields;

/// Reusable payment-order payee template.
///
/// Always holds plaintext. `dni`, `bank` and `accountNumber` are encrypted
/// by the persistence mapping, never here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PayOrderTemplate {
    id: String,
    name_entry: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    name_for: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    nit_for: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    dni: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    bank: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    account_number: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    deleted_at: Option<DateTime<Utc>>,
}

impl PayOrderTemplate {
    pub const NAME: &'static str = "PayOrderTemplate";

    pub fn from_json(json: &Value) -> Result<Self, EntityError> {
        let fields = Fields::new(Self::NAME, json);

        Ok(Self {
            id: fields.required("id")?,
            name_entry: fields.required("nameEntry")?,
            name_for: fields.optional("nameFor"),
            nit_for: fields.optional("nitFor"),
            dni: fields.optional("dni"),
            role: fields.optional("role"),
            bank: fields.optional("bank"),
            account_number: fields.optional("accountNumber"),
            created_at: fields.required_date("createdAt")?,
            updated_at: fields.required_date("updatedAt")?,
            deleted: fields.flag("deleted"),
            deleted_at: fields.optional_date("deletedAt")?,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name_entry(&self) -> &str {
        &self.name_entry
    }

    pub fn name_for(&self) -> Option<&str> {
        self.name_for.as_deref()
    }

    pub fn nit_for(&self) -> Option<&str> {
        self.nit_for.as_deref()
    }

    pub fn dni(&self) -> Option<&str> {
        self.dni.as_deref()
    }

    pub fn role(&self) -> Option<&str> {
        self.role.as_deref()
    }

    pub fn bank(&self) -> Option<&str> {
        self.bank.as_deref()
    }

    pub fn account_number(&self) -> Option<&str> {
        self.account_number.as_deref()
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

    #[test]
    fn minimal_template_has_no_optionals() {
        let now = Utc::now().to_rfc3339();
        let template = PayOrderTemplate::from_json(&json!({
            "id": "1",
            "nameEntry": "x",
            "createdAt": now,
            "updatedAt": now,
        }))
        .unwrap();

        assert_eq!(template.name_entry(), "x");
        assert!(!template.is_deleted());
        assert_eq!(template.name_for(), None);
        assert_eq!(template.nit_for(), None);
        assert_eq!(template.dni(), None);
        assert_eq!(template.role(), None);
        assert_eq!(template.bank(), None);
        assert_eq!(template.account_number(), None);
        assert_eq!(template.deleted_at(), None);
    }

    #[test]
    fn optional_fields_are_carried_verbatim() {
        let template = PayOrderTemplate::from_json(&json!({
            "id": "1",
            "nameEntry": "Office rent",
            "nameFor": "ACME",
            "nitFor": 1234567,
            "dni": "9876543",
            "role": "supplier",
            "bank": "Bank XYZ",
            "accountNumber": "000-111",
            "createdAt": "2024-01-01",
            "updatedAt": "2024-01-01",
        }))
        .unwrap();

        assert_eq!(template.nit_for(), Some("1234567"));
        assert_eq!(template.dni(), Some("9876543"));
        assert_eq!(template.account_number(), Some("000-111"));
    }

    #[test]
    fn missing_name_entry_is_rejected() {
        let err = PayOrderTemplate::from_json(&json!({
            "id": "1",
            "nameEntry": "",
            "createdAt": "2024-01-01",
            "updatedAt": "2024-01-01",
        }))
        .unwrap_err();

        assert_eq!(
            err,
            EntityError::MissingField {
                entity: PayOrderTemplate::NAME,
                field: "nameEntry"
            }
        );
    }

    #[test]
    fn invalid_updated_at_is_rejected() {
        let err = PayOrderTemplate::from_json(&json!({
            "id": "1",
            "nameEntry": "x",
            "createdAt": "2024-01-01",
            "updatedAt": "invalid-date",
        }))
        .unwrap_err();

        assert!(matches!(err, EntityError::InvalidDate { field: "updatedAt", .. }));
    }

    #[test]
    fn serialized_form_omits_absent_fields() {
        let template = PayOrderTemplate::from_json(&json!({
            "id": "1",
            "nameEntry": "x",
            "bank": "Bank XYZ",
            "createdAt": "2024-01-01",
            "updatedAt": "2024-01-01",
        }))
        .unwrap();

        let value = serde_json::to_value(&template).unwrap();
        assert_eq!(value["nameEntry"], "x");
        assert_eq!(value["bank"], "Bank XYZ");
        assert!(value.get("dni").is_none());
        assert!(value.get("accountNumber").is_none());
    }
}
