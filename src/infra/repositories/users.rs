//! User profile persistence.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde_json::Value;
use uuid::Uuid;

use super::base::{
    flag, nullable_date, required_text, text_value, to_record, unknown_column, Record, RecordStore,
};
use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use super::resource::Resource;
use crate::config::TABLE_USERS;
use crate::domain::{CreateUserDto, UpdateUserDto, User};
use crate::errors::{AppResult, OptionExt};

/// SeaORM-backed store for the `users` table.
pub struct UserTable {
    db: DatabaseConnection,
}

impl UserTable {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RecordStore for UserTable {
    async fn insert(&self, record: Record) -> AppResult<Record> {
        let now = Utc::now();
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            auth_id: Set(required_text(&record, "authId")?),
            name: Set(required_text(&record, "name")?),
            lastname: Set(required_text(&record, "lastname")?),
            created_at: Set(now),
            updated_at: Set(now),
            deleted: Set(false),
            deleted_at: Set(None),
        };

        let model = active_model.insert(&self.db).await?;
        to_record(&model)
    }

    async fn find_all_active(&self) -> AppResult<Vec<Record>> {
        UserEntity::find()
            .filter(user::Column::Deleted.eq(false))
            .order_by_asc(user::Column::CreatedAt)
            .all(&self.db)
            .await?
            .iter()
            .map(to_record)
            .collect()
    }

    async fn find_active(&self, id: &str) -> AppResult<Option<Record>> {
        UserEntity::find_by_id(id.to_string())
            .filter(user::Column::Deleted.eq(false))
            .one(&self.db)
            .await?
            .as_ref()
            .map(to_record)
            .transpose()
    }

    async fn update(&self, id: &str, changes: Record) -> AppResult<Record> {
        let model = UserEntity::find_by_id(id.to_string())
            .one(&self.db)
            .await?
            .ok_or_not_found(User::NAME)?;

        let mut active: ActiveModel = model.into();
        for (key, value) in &changes {
            match key.as_str() {
                "name" => active.name = Set(text_value(value, key)?),
                "lastname" => active.lastname = Set(text_value(value, key)?),
                "deleted" => active.deleted = Set(flag(value, key)?),
                "deletedAt" => active.deleted_at = Set(nullable_date(value, key)?),
                _ => return Err(unknown_column(TABLE_USERS, key)),
            }
        }
        active.updated_at = Set(Utc::now());

        let model = active.update(&self.db).await?;
        to_record(&model)
    }
}

/// Plain mapping between user DTOs, records and [`User`].
#[derive(Debug, Clone, Copy, Default)]
pub struct UserResource;

impl Resource for UserResource {
    type Entity = User;
    type Create = CreateUserDto;
    type Update = UpdateUserDto;

    const NAME: &'static str = User::NAME;

    fn create_record(&self, dto: &CreateUserDto) -> AppResult<Record> {
        let mut record = Record::new();
        record.insert("authId".into(), Value::from(dto.auth_id()));
        record.insert("name".into(), Value::from(dto.name()));
        record.insert("lastname".into(), Value::from(dto.lastname()));
        Ok(record)
    }

    fn update_id<'a>(&self, dto: &'a UpdateUserDto) -> &'a str {
        dto.id()
    }

    fn update_record(&self, dto: &UpdateUserDto) -> AppResult<Record> {
        Ok(dto.values())
    }

    fn to_entity(&self, record: Record) -> AppResult<User> {
        Ok(User::from_json(&Value::Object(record))?)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::domain::Dto;
    use crate::errors::AppError;

    #[test]
    fn create_record_copies_profile_fields() {
        let dto = CreateUserDto::create(&json!({"name": "J", "lastname": "D", "authId": "a"}))
            .unwrap();
        let record = UserResource.create_record(&dto).unwrap();

        assert_eq!(Value::Object(record), json!({"authId": "a", "name": "J", "lastname": "D"}));
    }

    #[test]
    fn update_record_is_the_partial_change_set() {
        let dto = UpdateUserDto::create(&json!({"id": "7", "lastname": "Diaz"})).unwrap();

        assert_eq!(UserResource.update_id(&dto), "7");
        assert_eq!(
            Value::Object(UserResource.update_record(&dto).unwrap()),
            json!({"lastname": "Diaz"})
        );
    }

    #[test]
    fn malformed_record_surfaces_as_malformed_error() {
        let record = json!({"id": "1", "authId": "a", "name": "J", "lastname": "D", "createdAt": "x"})
            .as_object()
            .cloned()
            .unwrap();

        assert!(matches!(
            UserResource.to_entity(record),
            Err(AppError::Malformed(_))
        ));
    }
}
