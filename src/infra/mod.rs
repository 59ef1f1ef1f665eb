//! Infrastructure layer - External systems integration
//!
//! This module handles all external system concerns:
//! - Database connections, migrations and record stores
//! - Field-level encryption of sensitive attributes
//! - The external identity provider

pub mod cipher;
pub mod db;
pub mod identity;
pub mod repositories;

pub use cipher::{FieldCipher, KeyMaterial};
pub use db::{Database, Migrator};
pub use identity::{IdentityProvider, SupabaseIdentity};
pub use repositories::{RecordStore, Resource};

#[cfg(any(test, feature = "test-utils"))]
pub use identity::MockIdentityProvider;
#[cfg(any(test, feature = "test-utils"))]
pub use repositories::MockRecordStore;
