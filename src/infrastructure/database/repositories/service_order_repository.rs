use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::{Expr, LikeExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

use super::checklist_repository::{insert_instance, insert_template, items_of};
use super::{db_err, new_id};
use crate::domain::service_order::{
    CreatedServiceOrder, NewServiceOrder, ServiceOrderRepository,
};
use crate::domain::{
    ChecklistBootstrap, DomainError, DomainResult, ServiceOrder, ServiceOrderChanges,
    ServiceOrderFilter, ServiceOrderStatus,
};
use crate::infrastructure::database::entities::service_order::{self, search_text};
use crate::shared::PaginatedResult;

pub struct SeaOrmServiceOrderRepository {
    db: DatabaseConnection,
}

impl SeaOrmServiceOrderRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn entity_status_to_domain(status: service_order::Status) -> ServiceOrderStatus {
    match status {
        service_order::Status::Open => ServiceOrderStatus::Open,
        service_order::Status::InProgress => ServiceOrderStatus::InProgress,
        service_order::Status::Done => ServiceOrderStatus::Done,
    }
}

fn domain_status_to_entity(status: ServiceOrderStatus) -> service_order::Status {
    match status {
        ServiceOrderStatus::Open => service_order::Status::Open,
        ServiceOrderStatus::InProgress => service_order::Status::InProgress,
        ServiceOrderStatus::Done => service_order::Status::Done,
    }
}

fn model_to_domain(model: service_order::Model) -> ServiceOrder {
    ServiceOrder {
        id: model.id,
        title: model.title,
        description: model.description,
        status: entity_status_to_domain(model.status),
        created_by_id: model.created_by_id,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

/// `%needle%` with LIKE metacharacters escaped by `\`.
fn like_pattern(needle: &str) -> String {
    let escaped = needle
        .to_lowercase()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

/// Matches against `search_text`, which is lowercased in Rust on write.
/// SQL `LOWER()` folds ASCII only on SQLite.
fn matches_query(pattern: &str) -> sea_orm::sea_query::SimpleExpr {
    Expr::col(service_order::Column::SearchText).like(LikeExpr::new(pattern).escape('\\'))
}

// ── Repository implementation ───────────────────────────────────

#[async_trait]
impl ServiceOrderRepository for SeaOrmServiceOrderRepository {
    async fn list(&self, filter: ServiceOrderFilter) -> DomainResult<PaginatedResult<ServiceOrder>> {
        let mut query = service_order::Entity::find();

        if let Some(status) = filter.status {
            query = query.filter(service_order::Column::Status.eq(domain_status_to_entity(status)));
        }

        if let Some(ref q) = filter.q {
            query = query.filter(matches_query(&like_pattern(q)));
        }

        let total = query.clone().count(&self.db).await.map_err(db_err)?;

        let models = query
            .order_by_desc(service_order::Column::CreatedAt)
            .offset(filter.pagination.offset())
            .limit(filter.pagination.limit)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(PaginatedResult::new(
            models.into_iter().map(model_to_domain).collect(),
            total,
        ))
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<ServiceOrder>> {
        let model = service_order::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn create(
        &self,
        order: NewServiceOrder,
        bootstrap: Option<ChecklistBootstrap>,
    ) -> DomainResult<CreatedServiceOrder> {
        let txn = self.db.begin().await.map_err(db_err)?;

        // Template first so a bad bootstrap aborts before the order row.
        let template_id = match bootstrap {
            None => None,
            Some(ChecklistBootstrap::Existing { template_id }) => {
                if items_of(&txn, &template_id).await?.is_empty() {
                    return Err(DomainError::Validation("Invalid or empty template".into()));
                }
                Some(template_id)
            }
            Some(ChecklistBootstrap::Create(new_template)) => {
                Some(insert_template(&txn, new_template).await?.template.id)
            }
        };

        let now = Utc::now();
        let model = service_order::ActiveModel {
            id: Set(new_id()),
            search_text: Set(search_text(&order.title, &order.description)),
            title: Set(order.title),
            description: Set(order.description),
            status: Set(service_order::Status::Open),
            created_by_id: Set(order.created_by_id),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(db_err)?;

        let checklist = match template_id {
            Some(template_id) => Some(insert_instance(&txn, &model.id, &template_id, now).await?),
            None => None,
        };

        txn.commit().await.map_err(db_err)?;

        Ok(CreatedServiceOrder {
            order: model_to_domain(model),
            checklist,
        })
    }

    async fn update(&self, id: &str, changes: ServiceOrderChanges) -> DomainResult<ServiceOrder> {
        let model = service_order::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or_else(|| DomainError::not_found("ServiceOrder", id))?;

        let title = changes.title.as_deref().unwrap_or(&model.title);
        let description = changes.description.as_deref().unwrap_or(&model.description);
        let folded = search_text(title, description);

        let mut active = model.into_active_model();
        active.search_text = Set(folded);
        if let Some(title) = changes.title {
            active.title = Set(title);
        }
        if let Some(description) = changes.description {
            active.description = Set(description);
        }
        if let Some(status) = changes.status {
            active.status = Set(domain_status_to_entity(status));
        }
        active.updated_at = Set(Utc::now());

        let updated = active.update(&self.db).await.map_err(db_err)?;
        Ok(model_to_domain(updated))
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        let result = service_order::Entity::delete_by_id(id.to_string())
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        if result.rows_affected == 0 {
            return Err(DomainError::not_found("ServiceOrder", id));
        }
        Ok(())
    }
}
