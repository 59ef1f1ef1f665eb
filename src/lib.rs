//! Pay order service.
//!
//! A REST API that fronts a hosted identity provider and stores user
//! profiles and pay order templates, encrypting the templates' banking
//! fields at rest.
//!
//! # Architecture Layers
//!
//! - **cli** / **commands**: command-line interface and its implementations
//! - **config**: environment configuration and constants
//! - **domain**: entities and request DTOs with their validation rules
//! - **services**: generic CRUD and authentication use cases
//! - **infra**: database, identity provider client, field cipher
//! - **api**: HTTP handlers, middleware, and routes
//! - **types**: shared response types
//! - **errors**: centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! pay-order-service serve --port 3000
//! pay-order-service migrate up
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;
pub mod types;

pub use api::AppState;
pub use config::Config;
pub use domain::{AuthIdentity, PayOrderTemplate, User};
pub use errors::{AppError, AppResult};
