use serde_json::{Map, Value};

use super::{optional, required, Dto, DtoResult};

/// Optional payee details shared by create and update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PayeeDetails {
    pub name_for: Option<String>,
    pub nit_for: Option<String>,
    pub dni: Option<String>,
    pub role: Option<String>,
    pub bank: Option<String>,
    pub account_number: Option<String>,
}

impl PayeeDetails {
    fn read(props: &Value) -> Self {
        Self {
            name_for: optional(props, "nameFor"),
            nit_for: optional(props, "nitFor"),
            dni: optional(props, "dni"),
            role: optional(props, "role"),
            bank: optional(props, "bank"),
            account_number: optional(props, "accountNumber"),
        }
    }

    /// Record keys paired with their plaintext values.
    pub fn entries(&self) -> [(&'static str, Option<&str>); 6] {
        [
            ("nameFor", self.name_for.as_deref()),
            ("nitFor", self.nit_for.as_deref()),
            ("dni", self.dni.as_deref()),
            ("role", self.role.as_deref()),
            ("bank", self.bank.as_deref()),
            ("accountNumber", self.account_number.as_deref()),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePayOrderTemplateDto {
    name_entry: String,
    details: PayeeDetails,
}

impl CreatePayOrderTemplateDto {
    pub fn name_entry(&self) -> &str {
        &self.name_entry
    }

    pub fn details(&self) -> &PayeeDetails {
        &self.details
    }
}

impl Dto for CreatePayOrderTemplateDto {
    fn create(props: &Value) -> DtoResult<Self> {
        Ok(Self {
            name_entry: required(props, "nameEntry")?,
            details: PayeeDetails::read(props),
        })
    }
}

/// Full replacement of a template's editable fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdatePayOrderTemplateDto {
    id: String,
    name_entry: String,
    details: PayeeDetails,
}

impl UpdatePayOrderTemplateDto {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name_entry(&self) -> &str {
        &self.name_entry
    }

    pub fn details(&self) -> &PayeeDetails {
        &self.details
    }

    /// Change set in plaintext. Absent optionals map to `null` and are cleared.
    pub fn values(&self) -> Map<String, Value> {
        let mut values = Map::new();
        values.insert("nameEntry".into(), Value::String(self.name_entry.clone()));
        for (key, value) in self.details.entries() {
            let value = value.map_or(Value::Null, |v| Value::String(v.to_string()));
            values.insert(key.into(), value);
        }
        values
    }
}

impl Dto for UpdatePayOrderTemplateDto {
    fn create(props: &Value) -> DtoResult<Self> {
        Ok(Self {
            id: required(props, "id")?,
            name_entry: required(props, "nameEntry")?,
            details: PayeeDetails::read(props),
        })
    }
}
