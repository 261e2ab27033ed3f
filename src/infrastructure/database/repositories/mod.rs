//! Database repository implementations
//!
//! Per-aggregate SeaORM repositories + unified RepositoryProvider.

pub mod checklist_repository;
pub mod photo_repository;
pub mod repository_provider;
pub mod service_order_repository;
pub mod user_repository;

pub use checklist_repository::SeaOrmChecklistRepository;
pub use photo_repository::SeaOrmPhotoRepository;
pub use repository_provider::SeaOrmRepositoryProvider;
pub use service_order_repository::SeaOrmServiceOrderRepository;
pub use user_repository::SeaOrmUserRepository;

use sea_orm::{DbErr, SqlErr};

use crate::domain::DomainError;

pub(crate) fn db_err(e: DbErr) -> DomainError {
    DomainError::Storage(format!("Database error: {}", e))
}

pub(crate) fn is_unique_violation(e: &DbErr) -> bool {
    matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

pub(crate) fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[cfg(test)]
pub(crate) async fn test_db() -> sea_orm::DatabaseConnection {
    use crate::infrastructure::database::{init_database, run_migrations, DatabaseConfig};

    let db = init_database(&DatabaseConfig::in_memory()).await.unwrap();
    run_migrations(&db).await.unwrap();
    db
}
