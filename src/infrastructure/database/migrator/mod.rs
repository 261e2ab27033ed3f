//! Database migrations module

pub use sea_orm_migration::prelude::*;

mod m20250101_000001_create_users;
mod m20250101_000002_create_service_orders;
mod m20250101_000003_create_checklist_templates;
mod m20250101_000004_create_service_order_checklists;
mod m20250101_000005_create_service_order_photos;
mod m20250101_000006_add_search_text_to_service_orders;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_create_users::Migration),
            Box::new(m20250101_000002_create_service_orders::Migration),
            Box::new(m20250101_000003_create_checklist_templates::Migration),
            Box::new(m20250101_000004_create_service_order_checklists::Migration),
            Box::new(m20250101_000005_create_service_order_photos::Migration),
            Box::new(m20250101_000006_add_search_text_to_service_orders::Migration),
        ]
    }
}
