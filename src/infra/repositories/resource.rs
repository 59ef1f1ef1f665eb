//! Resource descriptions consumed by the generic CRUD manager.

use serde::Serialize;

use super::base::Record;
use crate::domain::Dto;
use crate::errors::AppResult;

/// Everything the CRUD manager needs to know about one resource: its types,
/// how DTOs become records, and how records become entities.
pub trait Resource: Send + Sync + 'static {
    type Entity: Serialize + Send + Sync + 'static;
    type Create: Dto + Send + Sync + 'static;
    type Update: Dto + Send + Sync + 'static;

    /// Name used in not-found errors and logs
    const NAME: &'static str;

    /// Fields for a new row, in stored form.
    fn create_record(&self, dto: &Self::Create) -> AppResult<Record>;

    /// Id of the row an update addresses.
    fn update_id<'a>(&self, dto: &'a Self::Update) -> &'a str;

    /// Change set for an update, in stored form.
    fn update_record(&self, dto: &Self::Update) -> AppResult<Record>;

    /// Rebuild an entity from a stored row.
    fn to_entity(&self, record: Record) -> AppResult<Self::Entity>;
}
