//! Create service_order_checklists and checklist_answers tables
//!
//! A service order has at most one checklist instance (unique
//! `service_order_id`); an instance has at most one answer per item
//! (unique `(so_checklist_id, item_id)`).

use sea_orm_migration::prelude::*;

use super::m20250101_000002_create_service_orders::ServiceOrders;
use super::m20250101_000003_create_checklist_templates::{ChecklistItems, ChecklistTemplates};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ServiceOrderChecklists::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ServiceOrderChecklists::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ServiceOrderChecklists::ServiceOrderId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ServiceOrderChecklists::TemplateId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ServiceOrderChecklists::StartedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ServiceOrderChecklists::FinishedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_so_checklists_service_order")
                            .from(
                                ServiceOrderChecklists::Table,
                                ServiceOrderChecklists::ServiceOrderId,
                            )
                            .to(ServiceOrders::Table, ServiceOrders::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_so_checklists_template")
                            .from(
                                ServiceOrderChecklists::Table,
                                ServiceOrderChecklists::TemplateId,
                            )
                            .to(ChecklistTemplates::Table, ChecklistTemplates::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_so_checklists_service_order")
                    .table(ServiceOrderChecklists::Table)
                    .col(ServiceOrderChecklists::ServiceOrderId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ChecklistAnswers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ChecklistAnswers::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ChecklistAnswers::SoChecklistId)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ChecklistAnswers::ItemId).string().not_null())
                    .col(ColumnDef::new(ChecklistAnswers::BoolValue).boolean())
                    .col(ColumnDef::new(ChecklistAnswers::TextValue).text())
                    .col(ColumnDef::new(ChecklistAnswers::Note).text())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_checklist_answers_checklist")
                            .from(ChecklistAnswers::Table, ChecklistAnswers::SoChecklistId)
                            .to(ServiceOrderChecklists::Table, ServiceOrderChecklists::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_checklist_answers_item")
                            .from(ChecklistAnswers::Table, ChecklistAnswers::ItemId)
                            .to(ChecklistItems::Table, ChecklistItems::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_checklist_answers_item")
                    .table(ChecklistAnswers::Table)
                    .col(ChecklistAnswers::SoChecklistId)
                    .col(ChecklistAnswers::ItemId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ChecklistAnswers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ServiceOrderChecklists::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum ServiceOrderChecklists {
    Table,
    Id,
    ServiceOrderId,
    TemplateId,
    StartedAt,
    FinishedAt,
}

#[derive(Iden)]
pub enum ChecklistAnswers {
    Table,
    Id,
    SoChecklistId,
    ItemId,
    BoolValue,
    TextValue,
    Note,
}
