use serde_json::{Map, Value};

use super::{optional, required, Dto, DtoResult};

/// Profile to create for an existing identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateUserDto {
    name: String,
    lastname: String,
    auth_id: String,
}

impl CreateUserDto {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn lastname(&self) -> &str {
        &self.lastname
    }

    pub fn auth_id(&self) -> &str {
        &self.auth_id
    }
}

impl Dto for CreateUserDto {
    fn create(props: &Value) -> DtoResult<Self> {
        Ok(Self {
            name: required(props, "name")?,
            lastname: required(props, "lastname")?,
            auth_id: required(props, "authId")?,
        })
    }
}

/// Partial profile update addressed by id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateUserDto {
    id: String,
    name: Option<String>,
    lastname: Option<String>,
}

impl UpdateUserDto {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn lastname(&self) -> Option<&str> {
        self.lastname.as_deref()
    }

    /// Change set holding only the fields that were supplied.
    pub fn values(&self) -> Map<String, Value> {
        let mut values = Map::new();
        if let Some(name) = &self.name {
            values.insert("name".into(), Value::String(name.clone()));
        }
        if let Some(lastname) = &self.lastname {
            values.insert("lastname".into(), Value::String(lastname.clone()));
        }
        values
    }
}

impl Dto for UpdateUserDto {
    fn create(props: &Value) -> DtoResult<Self> {
        Ok(Self {
            id: required(props, "id")?,
            name: optional(props, "name"),
            lastname: optional(props, "lastname"),
        })
    }
}
