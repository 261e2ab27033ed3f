//! Migration: add the lowercased `search_text` column used by the `q` filter

use sea_orm::ConnectionTrait;
use sea_orm_migration::prelude::*;

use crate::infrastructure::database::entities::service_order::search_text;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .alter_table(
                Table::alter()
                    .table(ServiceOrders::Table)
                    .add_column(
                        ColumnDef::new(ServiceOrders::SearchText)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .to_owned(),
            )
            .await?;

        // Existing rows: SQL LOWER() is ASCII-only on SQLite, so fold in Rust.
        let db = manager.get_connection();
        let backend = manager.get_database_backend();
        let select = Query::select()
            .columns([
                ServiceOrders::Id,
                ServiceOrders::Title,
                ServiceOrders::Description,
            ])
            .from(ServiceOrders::Table)
            .to_owned();

        for row in db.query_all(backend.build(&select)).await? {
            let id: String = row.try_get("", "id")?;
            let title: String = row.try_get("", "title")?;
            let description: String = row.try_get("", "description")?;
            let update = Query::update()
                .table(ServiceOrders::Table)
                .value(ServiceOrders::SearchText, search_text(&title, &description))
                .and_where(Expr::col(ServiceOrders::Id).eq(id))
                .to_owned();
            db.execute(backend.build(&update)).await?;
        }
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .alter_table(
                Table::alter()
                    .table(ServiceOrders::Table)
                    .drop_column(ServiceOrders::SearchText)
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
enum ServiceOrders {
    Table,
    Id,
    Title,
    Description,
    SearchText,
}
