//! Domain layer: entities, validated request values and their errors.

pub mod dtos;
pub mod entities;
mod error;
pub(crate) mod json;

pub use dtos::{
    CreatePayOrderTemplateDto, CreateUserDto, Dto, DtoResult, InvalidData, LoginDto, LogoutDto,
    PayeeDetails, RegisterDto, UpdatePayOrderTemplateDto, UpdateUserDto,
};
pub use entities::{AuthIdentity, PayOrderTemplate, User};
pub use error::EntityError;
