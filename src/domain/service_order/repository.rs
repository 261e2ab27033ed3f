use async_trait::async_trait;

use super::{
    CreatedServiceOrder, NewServiceOrder, ServiceOrder, ServiceOrderChanges, ServiceOrderFilter,
};
use crate::domain::checklist::ChecklistBootstrap;
use crate::domain::DomainResult;
use crate::shared::types::PaginatedResult;

#[async_trait]
pub trait ServiceOrderRepository: Send + Sync {
    /// Filtered page, newest first, with the total matching count.
    async fn list(&self, filter: ServiceOrderFilter) -> DomainResult<PaginatedResult<ServiceOrder>>;

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<ServiceOrder>>;

    /// Insert the order and, when a bootstrap is given, the template (for
    /// `ChecklistBootstrap::Create`) and the checklist instance, all in one
    /// transaction. Callers validate the bootstrap first.
    async fn create(
        &self,
        order: NewServiceOrder,
        bootstrap: Option<ChecklistBootstrap>,
    ) -> DomainResult<CreatedServiceOrder>;

    async fn update(&self, id: &str, changes: ServiceOrderChanges) -> DomainResult<ServiceOrder>;

    /// Hard delete. Checklist, answers and photo rows go with it.
    async fn delete(&self, id: &str) -> DomainResult<()>;
}
