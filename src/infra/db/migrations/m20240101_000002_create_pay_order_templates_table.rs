//! Migration: Create pay order templates table.
//!
//! `dni`, `bank` and `account_number` hold hex ciphertext, never plaintext.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PayOrderTemplates::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PayOrderTemplates::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PayOrderTemplates::NameEntry).string().not_null())
                    .col(ColumnDef::new(PayOrderTemplates::NameFor).string().null())
                    .col(ColumnDef::new(PayOrderTemplates::NitFor).string().null())
                    .col(ColumnDef::new(PayOrderTemplates::Dni).text().null())
                    .col(ColumnDef::new(PayOrderTemplates::Role).string().null())
                    .col(ColumnDef::new(PayOrderTemplates::Bank).text().null())
                    .col(ColumnDef::new(PayOrderTemplates::AccountNumber).text().null())
                    .col(
                        ColumnDef::new(PayOrderTemplates::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PayOrderTemplates::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PayOrderTemplates::Deleted)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(PayOrderTemplates::DeletedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_pay_order_templates_deleted")
                    .table(PayOrderTemplates::Table)
                    .col(PayOrderTemplates::Deleted)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PayOrderTemplates::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum PayOrderTemplates {
    Table,
    Id,
    NameEntry,
    NameFor,
    NitFor,
    Dni,
    Role,
    Bank,
    AccountNumber,
    CreatedAt,
    UpdatedAt,
    Deleted,
    DeletedAt,
}
