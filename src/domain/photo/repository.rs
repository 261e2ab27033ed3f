use async_trait::async_trait;

use super::{NewPhoto, Photo};
use crate::domain::DomainResult;

#[async_trait]
pub trait PhotoRepository: Send + Sync {
    async fn create(&self, photo: NewPhoto) -> DomainResult<Photo>;
    /// Newest first.
    async fn list_by_service_order(&self, service_order_id: &str) -> DomainResult<Vec<Photo>>;
    async fn count_by_service_order(&self, service_order_id: &str) -> DomainResult<u64>;
}
