//! Repository layer - Data access abstraction
//!
//! Tables move raw records in and out of the database; resources describe
//! how records map to domain entities.

mod base;
pub(crate) mod entities;
mod pay_order_templates;
mod resource;
mod users;

pub use base::{Record, RecordStore};
pub use pay_order_templates::{PayOrderTemplateResource, PayOrderTemplateTable, ENCRYPTED_FIELDS};
pub use resource::Resource;
pub use users::{UserResource, UserTable};

// Export mock for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use base::MockRecordStore;
