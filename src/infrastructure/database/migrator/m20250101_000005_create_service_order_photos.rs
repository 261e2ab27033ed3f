//! Create service_order_photos table

use sea_orm_migration::prelude::*;

use super::m20250101_000002_create_service_orders::ServiceOrders;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ServiceOrderPhotos::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ServiceOrderPhotos::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ServiceOrderPhotos::ServiceOrderId)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ServiceOrderPhotos::Key).string().not_null())
                    .col(
                        ColumnDef::new(ServiceOrderPhotos::MimeType)
                            .string_len(50)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ServiceOrderPhotos::Size)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ServiceOrderPhotos::TakenAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_so_photos_service_order")
                            .from(ServiceOrderPhotos::Table, ServiceOrderPhotos::ServiceOrderId)
                            .to(ServiceOrders::Table, ServiceOrders::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_so_photos_service_order")
                    .table(ServiceOrderPhotos::Table)
                    .col(ServiceOrderPhotos::ServiceOrderId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ServiceOrderPhotos::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum ServiceOrderPhotos {
    Table,
    Id,
    ServiceOrderId,
    Key,
    MimeType,
    Size,
    TakenAt,
}
