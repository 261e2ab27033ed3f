use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

use super::{db_err, new_id};
use crate::domain::photo::PhotoRepository;
use crate::domain::{DomainResult, NewPhoto, Photo};
use crate::infrastructure::database::entities::service_order_photo;

pub struct SeaOrmPhotoRepository {
    db: DatabaseConnection,
}

impl SeaOrmPhotoRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn model_to_domain(model: service_order_photo::Model) -> Photo {
    Photo {
        id: model.id,
        service_order_id: model.service_order_id,
        key: model.key,
        mime_type: model.mime_type,
        size: model.size,
        taken_at: model.taken_at,
    }
}

#[async_trait]
impl PhotoRepository for SeaOrmPhotoRepository {
    async fn create(&self, photo: NewPhoto) -> DomainResult<Photo> {
        let model = service_order_photo::ActiveModel {
            id: Set(new_id()),
            service_order_id: Set(photo.service_order_id),
            key: Set(photo.key),
            mime_type: Set(photo.mime_type),
            size: Set(photo.size),
            taken_at: Set(Utc::now()),
        }
        .insert(&self.db)
        .await
        .map_err(db_err)?;
        Ok(model_to_domain(model))
    }

    async fn list_by_service_order(&self, service_order_id: &str) -> DomainResult<Vec<Photo>> {
        let models = service_order_photo::Entity::find()
            .filter(service_order_photo::Column::ServiceOrderId.eq(service_order_id))
            .order_by_desc(service_order_photo::Column::TakenAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn count_by_service_order(&self, service_order_id: &str) -> DomainResult<u64> {
        service_order_photo::Entity::find()
            .filter(service_order_photo::Column::ServiceOrderId.eq(service_order_id))
            .count(&self.db)
            .await
            .map_err(db_err)
    }
}
