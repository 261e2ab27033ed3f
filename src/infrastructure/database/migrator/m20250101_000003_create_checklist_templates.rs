//! Create checklist_templates and checklist_items tables

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ChecklistTemplates::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ChecklistTemplates::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ChecklistTemplates::Name).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ChecklistItems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ChecklistItems::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ChecklistItems::TemplateId)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ChecklistItems::Label).string().not_null())
                    .col(
                        ColumnDef::new(ChecklistItems::Required)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(ChecklistItems::Position)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_checklist_items_template")
                            .from(ChecklistItems::Table, ChecklistItems::TemplateId)
                            .to(ChecklistTemplates::Table, ChecklistTemplates::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_checklist_items_template")
                    .table(ChecklistItems::Table)
                    .col(ChecklistItems::TemplateId)
                    .col(ChecklistItems::Position)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ChecklistItems::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ChecklistTemplates::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum ChecklistTemplates {
    Table,
    Id,
    Name,
}

#[derive(Iden)]
pub enum ChecklistItems {
    Table,
    Id,
    TemplateId,
    Label,
    Required,
    Position,
}
