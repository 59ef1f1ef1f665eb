//! Pay order template database entity for SeaORM.

use sea_orm::entity::prelude::*;
use serde::Serialize;

/// `dni`, `bank` and `account_number` hold hex ciphertext.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "pay_order_templates")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name_entry: String,
    pub name_for: Option<String>,
    pub nit_for: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub dni: Option<String>,
    pub role: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub bank: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub account_number: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub deleted: bool,
    pub deleted_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
