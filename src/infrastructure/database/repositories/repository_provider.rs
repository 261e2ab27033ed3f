//! SeaORM implementation of RepositoryProvider

use async_trait::async_trait;
use sea_orm::DatabaseConnection;

use crate::domain::checklist::ChecklistRepository;
use crate::domain::photo::PhotoRepository;
use crate::domain::repositories::RepositoryProvider;
use crate::domain::service_order::ServiceOrderRepository;
use crate::domain::user::UserRepository;
use crate::domain::DomainResult;

use super::checklist_repository::SeaOrmChecklistRepository;
use super::db_err;
use super::photo_repository::SeaOrmPhotoRepository;
use super::service_order_repository::SeaOrmServiceOrderRepository;
use super::user_repository::SeaOrmUserRepository;

/// Unified repository provider backed by SeaORM.
///
/// Holds one connection pool and exposes per-aggregate repository accessors.
///
/// ```ignore
/// let repos = SeaOrmRepositoryProvider::new(db.clone());
/// let so = repos.service_orders().find_by_id("so-1").await?;
/// let inst = repos.checklists().find_by_service_order("so-1").await?;
/// ```
pub struct SeaOrmRepositoryProvider {
    db: DatabaseConnection,
    users: SeaOrmUserRepository,
    service_orders: SeaOrmServiceOrderRepository,
    checklists: SeaOrmChecklistRepository,
    photos: SeaOrmPhotoRepository,
}

impl SeaOrmRepositoryProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            users: SeaOrmUserRepository::new(db.clone()),
            service_orders: SeaOrmServiceOrderRepository::new(db.clone()),
            checklists: SeaOrmChecklistRepository::new(db.clone()),
            photos: SeaOrmPhotoRepository::new(db.clone()),
            db,
        }
    }
}

#[async_trait]
impl RepositoryProvider for SeaOrmRepositoryProvider {
    fn users(&self) -> &dyn UserRepository {
        &self.users
    }

    fn service_orders(&self) -> &dyn ServiceOrderRepository {
        &self.service_orders
    }

    fn checklists(&self) -> &dyn ChecklistRepository {
        &self.checklists
    }

    fn photos(&self) -> &dyn PhotoRepository {
        &self.photos
    }

    async fn ping(&self) -> DomainResult<()> {
        self.db.ping().await.map_err(db_err)
    }
}
