//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They depend on abstractions (traits) for
//! dependency inversion.

mod auth_service;
pub mod container;
mod crud;

// Service Container
pub use container::{DynPayOrderTemplateService, Services};

// Service traits and implementations
pub use auth_service::{AuthService, Authenticator, Claims, DynUserService, Registration};
pub use crud::{CrudManager, CrudService, PayOrderTemplateService, UserService};
