//! Validated request values.
//!
//! Every DTO is built from untrusted JSON through [`Dto::create`]. Validation
//! is presence-only; unknown keys are ignored and never copied.

mod auth;
mod pay_order_template;
mod user;

use serde_json::Value;
use thiserror::Error;

use crate::config::INVALID_DATA_MESSAGE;
use crate::domain::json;

pub use auth::{LoginDto, LogoutDto, RegisterDto};
pub use pay_order_template::{CreatePayOrderTemplateDto, PayeeDetails, UpdatePayOrderTemplateDto};
pub use user::{CreateUserDto, UpdateUserDto};

/// Rejection of a DTO input. Carries no detail beyond the literal message.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("{}", INVALID_DATA_MESSAGE)]
pub struct InvalidData;

pub type DtoResult<T> = Result<T, InvalidData>;

/// Construction contract shared by every DTO.
pub trait Dto: Sized {
    fn create(props: &Value) -> DtoResult<Self>;
}

fn required(props: &Value, key: &str) -> DtoResult<String> {
    json::text(props, key).ok_or(InvalidData)
}

fn optional(props: &Value, key: &str) -> Option<String> {
    json::text(props, key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_data_displays_literal_message() {
        assert_eq!(InvalidData.to_string(), "Invalid Data");
    }
}
