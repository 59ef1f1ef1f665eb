//! Generic CRUD use cases, instantiated once per resource.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;

use crate::errors::{AppResult, OptionExt};
use crate::infra::repositories::{
    PayOrderTemplateResource, Record, RecordStore, Resource, UserResource,
};

/// CRUD use cases over one resource.
///
/// Reads never return soft-deleted entities. Update and delete fail with
/// `NotFound` when the target is missing or already deleted.
#[async_trait]
pub trait CrudService: Send + Sync {
    type Entity: Send;
    type Create: Send;
    type Update: Send;

    async fn create(&self, dto: Self::Create) -> AppResult<Self::Entity>;

    async fn get_all(&self) -> AppResult<Vec<Self::Entity>>;

    async fn get_by_id(&self, id: &str) -> AppResult<Self::Entity>;

    async fn update(&self, dto: Self::Update) -> AppResult<Self::Entity>;

    /// Soft delete, returning the entity as deleted.
    async fn delete_by_id(&self, id: &str) -> AppResult<Self::Entity>;
}

/// The one implementation of [`CrudService`], parameterised by resource.
pub struct CrudManager<R: Resource> {
    resource: R,
    store: Arc<dyn RecordStore>,
}

pub type UserService = CrudManager<UserResource>;
pub type PayOrderTemplateService = CrudManager<PayOrderTemplateResource>;

impl<R: Resource> CrudManager<R> {
    pub fn new(resource: R, store: Arc<dyn RecordStore>) -> Self {
        Self { resource, store }
    }

    async fn require_active(&self, id: &str) -> AppResult<Record> {
        self.store.find_active(id).await?.ok_or_not_found(R::NAME)
    }
}

#[async_trait]
impl<R: Resource> CrudService for CrudManager<R> {
    type Entity = R::Entity;
    type Create = R::Create;
    type Update = R::Update;

    #[tracing::instrument(skip_all, fields(resource = R::NAME))]
    async fn create(&self, dto: R::Create) -> AppResult<R::Entity> {
        let record = self.resource.create_record(&dto)?;
        let stored = self.store.insert(record).await?;
        self.resource.to_entity(stored)
    }

    async fn get_all(&self) -> AppResult<Vec<R::Entity>> {
        self.store
            .find_all_active()
            .await?
            .into_iter()
            .map(|record| self.resource.to_entity(record))
            .collect()
    }

    async fn get_by_id(&self, id: &str) -> AppResult<R::Entity> {
        let record = self.require_active(id).await?;
        self.resource.to_entity(record)
    }

    #[tracing::instrument(skip_all, fields(resource = R::NAME))]
    async fn update(&self, dto: R::Update) -> AppResult<R::Entity> {
        let id = self.resource.update_id(&dto).to_string();
        self.require_active(&id).await?;

        let changes = self.resource.update_record(&dto)?;
        let updated = self.store.update(&id, changes).await?;
        self.resource.to_entity(updated)
    }

    #[tracing::instrument(skip(self), fields(resource = R::NAME))]
    async fn delete_by_id(&self, id: &str) -> AppResult<R::Entity> {
        self.require_active(id).await?;

        let mut changes = Record::new();
        changes.insert("deleted".into(), Value::Bool(true));
        changes.insert("deletedAt".into(), Value::String(Utc::now().to_rfc3339()));

        let deleted = self.store.update(id, changes).await?;
        tracing::info!(id, "Soft-deleted {}", R::NAME);
        self.resource.to_entity(deleted)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::domain::{CreateUserDto, Dto, UpdateUserDto};
    use crate::errors::AppError;
    use crate::infra::repositories::MockRecordStore;

    fn user_record(id: &str) -> Record {
        json!({
            "id": id,
            "authId": "auth-1",
            "name": "J",
            "lastname": "D",
            "createdAt": "2024-01-01T00:00:00Z",
            "updatedAt": "2024-01-01T00:00:00Z",
            "deleted": false,
            "deletedAt": null,
        })
        .as_object()
        .cloned()
        .unwrap()
    }

    fn service(store: MockRecordStore) -> UserService {
        CrudManager::new(UserResource, Arc::new(store))
    }

    #[tokio::test]
    async fn create_stores_record_and_returns_entity() {
        let mut store = MockRecordStore::new();
        store
            .expect_insert()
            .withf(|record| record.get("authId") == Some(&json!("auth-1")))
            .times(1)
            .returning(|_| Ok(user_record("1")));

        let dto = CreateUserDto::create(&json!({"name": "J", "lastname": "D", "authId": "auth-1"}))
            .unwrap();
        let user = service(store).create(dto).await.unwrap();

        assert_eq!(user.id(), "1");
        assert!(!user.is_deleted());
    }

    #[tokio::test]
    async fn get_by_id_missing_is_not_found() {
        let mut store = MockRecordStore::new();
        store.expect_find_active().returning(|_| Ok(None));

        let err = service(store).get_by_id("404").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound("User")));
    }

    #[tokio::test]
    async fn update_checks_existence_first() {
        let mut store = MockRecordStore::new();
        store.expect_find_active().returning(|_| Ok(None));
        store.expect_update().never();

        let dto = UpdateUserDto::create(&json!({"id": "1", "name": "X"})).unwrap();
        let err = service(store).update(dto).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn update_sends_only_present_fields() {
        let mut store = MockRecordStore::new();
        store
            .expect_find_active()
            .returning(|id| Ok(Some(user_record(id))));
        store
            .expect_update()
            .withf(|id, changes| id == "1" && changes.len() == 1 && changes["name"] == "Juan")
            .times(1)
            .returning(|id, _| {
                let mut record = user_record(id);
                record.insert("name".into(), json!("Juan"));
                Ok(record)
            });

        let dto = UpdateUserDto::create(&json!({"id": "1", "name": "Juan"})).unwrap();
        let user = service(store).update(dto).await.unwrap();
        assert_eq!(user.name(), "Juan");
    }

    #[tokio::test]
    async fn delete_is_soft() {
        let mut store = MockRecordStore::new();
        store
            .expect_find_active()
            .returning(|id| Ok(Some(user_record(id))));
        store
            .expect_update()
            .withf(|_, changes| {
                changes["deleted"] == json!(true) && changes["deletedAt"].is_string()
            })
            .times(1)
            .returning(|id, changes| {
                let mut record = user_record(id);
                record.extend(changes);
                Ok(record)
            });

        let user = service(store).delete_by_id("1").await.unwrap();
        assert!(user.is_deleted());
        assert!(user.deleted_at().is_some());
    }

    #[tokio::test]
    async fn delete_missing_is_not_found() {
        let mut store = MockRecordStore::new();
        store.expect_find_active().returning(|_| Ok(None));
        store.expect_update().never();

        assert!(matches!(
            service(store).delete_by_id("1").await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn get_all_rebuilds_every_record() {
        let mut store = MockRecordStore::new();
        store
            .expect_find_all_active()
            .returning(|| Ok(vec![user_record("1"), user_record("2")]));

        let users = service(store).get_all().await.unwrap();
        let ids: Vec<&str> = users.iter().map(|u| u.id()).collect();
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[tokio::test]
    async fn malformed_stored_record_fails_the_read() {
        let mut store = MockRecordStore::new();
        store.expect_find_active().returning(|id| {
            let mut record = user_record(id);
            record.insert("createdAt".into(), json!("invalid-date"));
            Ok(Some(record))
        });

        assert!(matches!(
            service(store).get_by_id("1").await,
            Err(AppError::Malformed(_))
        ));
    }
}
