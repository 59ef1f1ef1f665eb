//! Pay order template persistence with field-level encryption.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde_json::Value;
use uuid::Uuid;

use super::base::{
    flag, nullable_date, nullable_text, optional_text, required_text, text_value, to_record,
    unknown_column, Record, RecordStore,
};
use super::entities::pay_order_template::{self, ActiveModel, Entity as PayOrderTemplateEntity};
use super::resource::Resource;
use crate::config::TABLE_PAY_ORDER_TEMPLATES;
use crate::domain::{CreatePayOrderTemplateDto, PayOrderTemplate, UpdatePayOrderTemplateDto};
use crate::errors::{AppResult, OptionExt};
use crate::infra::cipher::FieldCipher;

/// Record keys stored as ciphertext.
pub const ENCRYPTED_FIELDS: [&str; 3] = ["dni", "bank", "accountNumber"];

/// SeaORM-backed store for the `pay_order_templates` table.
///
/// Stores whatever it is given; encryption happens in
/// [`PayOrderTemplateResource`].
pub struct PayOrderTemplateTable {
    db: DatabaseConnection,
}

impl PayOrderTemplateTable {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RecordStore for PayOrderTemplateTable {
    async fn insert(&self, record: Record) -> AppResult<Record> {
        let now = Utc::now();
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            name_entry: Set(required_text(&record, "nameEntry")?),
            name_for: Set(optional_text(&record, "nameFor")?),
            nit_for: Set(optional_text(&record, "nitFor")?),
            dni: Set(optional_text(&record, "dni")?),
            role: Set(optional_text(&record, "role")?),
            bank: Set(optional_text(&record, "bank")?),
            account_number: Set(optional_text(&record, "accountNumber")?),
            created_at: Set(now),
            updated_at: Set(now),
            deleted: Set(false),
            deleted_at: Set(None),
        };

        let model = active_model.insert(&self.db).await?;
        to_record(&model)
    }

    async fn find_all_active(&self) -> AppResult<Vec<Record>> {
        PayOrderTemplateEntity::find()
            .filter(pay_order_template::Column::Deleted.eq(false))
            .order_by_asc(pay_order_template::Column::CreatedAt)
            .all(&self.db)
            .await?
            .iter()
            .map(to_record)
            .collect()
    }

    async fn find_active(&self, id: &str) -> AppResult<Option<Record>> {
        PayOrderTemplateEntity::find_by_id(id.to_string())
            .filter(pay_order_template::Column::Deleted.eq(false))
            .one(&self.db)
            .await?
            .as_ref()
            .map(to_record)
            .transpose()
    }

    async fn update(&self, id: &str, changes: Record) -> AppResult<Record> {
        let model = PayOrderTemplateEntity::find_by_id(id.to_string())
            .one(&self.db)
            .await?
            .ok_or_not_found(PayOrderTemplate::NAME)?;

        let mut active: ActiveModel = model.into();
        for (key, value) in &changes {
            match key.as_str() {
                "nameEntry" => active.name_entry = Set(text_value(value, key)?),
                "nameFor" => active.name_for = Set(nullable_text(value, key)?),
                "nitFor" => active.nit_for = Set(nullable_text(value, key)?),
                "dni" => active.dni = Set(nullable_text(value, key)?),
                "role" => active.role = Set(nullable_text(value, key)?),
                "bank" => active.bank = Set(nullable_text(value, key)?),
                "accountNumber" => active.account_number = Set(nullable_text(value, key)?),
                "deleted" => active.deleted = Set(flag(value, key)?),
                "deletedAt" => active.deleted_at = Set(nullable_date(value, key)?),
                _ => return Err(unknown_column(TABLE_PAY_ORDER_TEMPLATES, key)),
            }
        }
        active.updated_at = Set(Utc::now());

        let model = active.update(&self.db).await?;
        to_record(&model)
    }
}

/// Maps templates to records, sealing sensitive fields on the way in and
/// opening them on the way out. Absent fields stay absent.
#[derive(Clone)]
pub struct PayOrderTemplateResource {
    cipher: Arc<FieldCipher>,
}

impl PayOrderTemplateResource {
    pub fn new(cipher: Arc<FieldCipher>) -> Self {
        Self { cipher }
    }

    fn seal(&self, record: &mut Record) -> AppResult<()> {
        for key in ENCRYPTED_FIELDS {
            let sealed = self
                .cipher
                .encrypt_if_present(record.get(key).and_then(Value::as_str))?;
            if let Some(sealed) = sealed {
                record.insert(key.into(), Value::String(sealed));
            }
        }
        Ok(())
    }

    fn open(&self, record: &mut Record) -> AppResult<()> {
        for key in ENCRYPTED_FIELDS {
            let stored = record
                .get(key)
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty());
            let plain = self.cipher.decrypt_if_present(stored)?;
            if let Some(plain) = plain {
                record.insert(key.into(), Value::String(plain));
            }
        }
        Ok(())
    }
}

impl Resource for PayOrderTemplateResource {
    type Entity = PayOrderTemplate;
    type Create = CreatePayOrderTemplateDto;
    type Update = UpdatePayOrderTemplateDto;

    const NAME: &'static str = PayOrderTemplate::NAME;

    fn create_record(&self, dto: &CreatePayOrderTemplateDto) -> AppResult<Record> {
        let mut record = Record::new();
        record.insert("nameEntry".into(), Value::from(dto.name_entry()));
        for (key, value) in dto.details().entries() {
            if let Some(value) = value {
                record.insert(key.into(), Value::from(value));
            }
        }

        self.seal(&mut record)?;
        Ok(record)
    }

    fn update_id<'a>(&self, dto: &'a UpdatePayOrderTemplateDto) -> &'a str {
        dto.id()
    }

    fn update_record(&self, dto: &UpdatePayOrderTemplateDto) -> AppResult<Record> {
        let mut record = dto.values();
        self.seal(&mut record)?;
        Ok(record)
    }

    fn to_entity(&self, mut record: Record) -> AppResult<PayOrderTemplate> {
        self.open(&mut record)?;
        Ok(PayOrderTemplate::from_json(&Value::Object(record))?)
    }
}
