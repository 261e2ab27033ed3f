//! Service order lifecycle service
//!
//! Creation forces OPEN and may bootstrap a checklist in the same store
//! transaction. Updates never move the status backwards.

use std::sync::Arc;

use tracing::info;

use crate::application::checklist::{validate_new_template, ChecklistService};
use crate::domain::service_order::{CreatedServiceOrder, NewServiceOrder};
use crate::domain::{
    ensure_owner_or_admin, Actor, ChecklistBootstrap, DomainError, DomainResult,
    NewChecklistTemplate, RepositoryProvider, ServiceOrder, ServiceOrderChanges,
    ServiceOrderFilter, ServiceOrderStatus, ServiceOrderWithChecklist,
};
use crate::shared::validations::{trim_optional, validate_pagination};
use crate::shared::PaginatedResult;

/// Raw list query as received from the caller
#[derive(Debug, Clone, Default)]
pub struct ServiceOrderQuery {
    pub status: Option<ServiceOrderStatus>,
    pub q: Option<String>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

#[derive(Debug, Clone, Default)]
pub struct CreateServiceOrder {
    pub title: String,
    pub description: Option<String>,
    pub template_id: Option<String>,
    pub new_checklist: Option<NewChecklistTemplate>,
}

pub struct ServiceOrderService {
    repos: Arc<dyn RepositoryProvider>,
    checklists: Arc<ChecklistService>,
}

impl ServiceOrderService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, checklists: Arc<ChecklistService>) -> Self {
        Self { repos, checklists }
    }

    pub async fn list(&self, query: ServiceOrderQuery) -> DomainResult<PaginatedResult<ServiceOrder>> {
        let pagination = validate_pagination(query.page, query.limit)?;
        let filter = ServiceOrderFilter {
            status: query.status,
            q: trim_optional(query.q.as_deref()),
            pagination,
        };
        self.repos.service_orders().list(filter).await
    }

    pub async fn get(&self, id: &str) -> DomainResult<ServiceOrderWithChecklist> {
        let order = self.load(id).await?;
        let checklist = self.checklists.get_detail_for_so(id).await?;
        Ok(ServiceOrderWithChecklist { order, checklist })
    }

    pub async fn create(
        &self,
        input: CreateServiceOrder,
        actor: &Actor,
    ) -> DomainResult<CreatedServiceOrder> {
        let title = validate_title(&input.title)?;
        let description = input
            .description
            .as_deref()
            .map(str::trim)
            .unwrap_or_default()
            .to_string();

        let bootstrap = match (input.template_id, input.new_checklist) {
            (Some(_), Some(_)) => {
                return Err(DomainError::Validation(
                    "Provide either templateId or newChecklist, not both".into(),
                ))
            }
            (Some(template_id), None) => {
                if self
                    .repos
                    .checklists()
                    .template_items(&template_id)
                    .await?
                    .is_empty()
                {
                    return Err(DomainError::Validation("Invalid or empty template".into()));
                }
                Some(ChecklistBootstrap::Existing { template_id })
            }
            (None, Some(new_checklist)) => {
                Some(ChecklistBootstrap::Create(validate_new_template(new_checklist)?))
            }
            (None, None) => None,
        };

        let created = self
            .repos
            .service_orders()
            .create(
                NewServiceOrder {
                    title,
                    description,
                    created_by_id: actor.id.clone(),
                },
                bootstrap,
            )
            .await?;

        info!(
            service_order_id = %created.order.id,
            actor_id = %actor.id,
            with_checklist = created.checklist.is_some(),
            "Service order created"
        );
        Ok(created)
    }

    pub async fn update(
        &self,
        id: &str,
        changes: ServiceOrderChanges,
        actor: &Actor,
    ) -> DomainResult<ServiceOrder> {
        let current = self.load(id).await?;
        ensure_owner_or_admin(actor, &current.created_by_id)?;

        if let Some(next) = changes.status {
            if !current.status.can_transition_to(next) {
                return Err(DomainError::InvalidState(
                    "Status regression not allowed".into(),
                ));
            }
        }

        let changes = ServiceOrderChanges {
            title: changes.title.as_deref().map(validate_title).transpose()?,
            description: changes.description.map(|d| d.trim().to_string()),
            status: changes.status,
        };
        if changes.is_empty() {
            return Ok(current);
        }

        let updated = self.repos.service_orders().update(id, changes).await?;
        info!(
            service_order_id = %id,
            from = %current.status,
            to = %updated.status,
            "Service order updated"
        );
        Ok(updated)
    }

    pub async fn remove(&self, id: &str, actor: &Actor) -> DomainResult<()> {
        let current = self.load(id).await?;
        ensure_owner_or_admin(actor, &current.created_by_id)?;

        self.repos.service_orders().delete(id).await?;
        info!(service_order_id = %id, actor_id = %actor.id, "Service order deleted");
        Ok(())
    }

    async fn load(&self, id: &str) -> DomainResult<ServiceOrder> {
        self.repos
            .service_orders()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("ServiceOrder", id))
    }
}

fn validate_title(title: &str) -> DomainResult<String> {
    let title = title.trim();
    if title.chars().count() < 2 {
        return Err(DomainError::Validation(
            "Title must be at least 2 characters".into(),
        ));
    }
    Ok(title.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::{new_template, Fixture};

    fn service(fx: &Fixture) -> ServiceOrderService {
        let checklists = Arc::new(ChecklistService::new(fx.provider()));
        ServiceOrderService::new(fx.provider(), checklists)
    }

    fn to_status(status: ServiceOrderStatus) -> ServiceOrderChanges {
        ServiceOrderChanges {
            status: Some(status),
            ..Default::default()
        }
    }

    fn input(title: &str) -> CreateServiceOrder {
        CreateServiceOrder {
            title: title.into(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn ownership_scenario() {
        let fx = Fixture::new().await;
        let svc = service(&fx);
        let order = fx.order_owned_by(&fx.owner).await;

        let denied = svc
            .update(&order.id, to_status(ServiceOrderStatus::Done), &fx.other)
            .await
            .unwrap_err();
        assert!(matches!(denied, DomainError::Forbidden(_)));

        let done = svc
            .update(&order.id, to_status(ServiceOrderStatus::Done), &fx.owner)
            .await
            .unwrap();
        assert_eq!(done.status, ServiceOrderStatus::Done);

        let renamed = svc
            .update(
                &order.id,
                ServiceOrderChanges {
                    title: Some("Revisado pelo admin".into()),
                    ..Default::default()
                },
                &fx.admin,
            )
            .await
            .unwrap();
        assert_eq!(renamed.title, "Revisado pelo admin");
        assert_eq!(renamed.created_by_id, fx.owner.id);
    }

    #[tokio::test]
    async fn status_regression_rejected() {
        let fx = Fixture::new().await;
        let svc = service(&fx);
        let order = fx.order_owned_by(&fx.owner).await;

        svc.update(&order.id, to_status(ServiceOrderStatus::InProgress), &fx.owner)
            .await
            .unwrap();
        svc.update(&order.id, to_status(ServiceOrderStatus::InProgress), &fx.owner)
            .await
            .unwrap();

        let err = svc
            .update(&order.id, to_status(ServiceOrderStatus::Open), &fx.owner)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidState(ref m) if m == "Status regression not allowed"));

        let current = svc.get(&order.id).await.unwrap().order;
        assert_eq!(current.status, ServiceOrderStatus::InProgress);
    }

    #[tokio::test]
    async fn create_trims_and_forces_open() {
        let fx = Fixture::new().await;
        let svc = service(&fx);

        let created = svc
            .create(
                CreateServiceOrder {
                    title: "  Troca de hardware ".into(),
                    description: Some("  Substituir fonte  ".into()),
                    ..Default::default()
                },
                &fx.other,
            )
            .await
            .unwrap();
        assert_eq!(created.order.title, "Troca de hardware");
        assert_eq!(created.order.description, "Substituir fonte");
        assert_eq!(created.order.status, ServiceOrderStatus::Open);
        assert_eq!(created.order.created_by_id, fx.other.id);
        assert!(created.checklist.is_none());
    }

    #[tokio::test]
    async fn create_with_existing_template_starts_checklist() {
        let fx = Fixture::new().await;
        let svc = service(&fx);
        let tpl = fx.padrao_template().await;

        let created = svc
            .create(
                CreateServiceOrder {
                    template_id: Some(tpl.template.id.clone()),
                    ..input("Instalação inicial")
                },
                &fx.owner,
            )
            .await
            .unwrap();
        let checklist = created.checklist.unwrap();
        assert_eq!(checklist.template_id, tpl.template.id);
        assert!(checklist.finished_at.is_none());

        let detail = svc.get(&created.order.id).await.unwrap();
        assert_eq!(detail.checklist.unwrap().items.len(), 3);
    }

    #[tokio::test]
    async fn create_with_new_checklist_creates_template() {
        let fx = Fixture::new().await;
        let svc = service(&fx);

        let created = svc
            .create(
                CreateServiceOrder {
                    new_checklist: Some(new_template(
                        "Vistoria rápida",
                        &[("Conferir lacres", true), ("Fotos", false)],
                    )),
                    ..input("Vistoria")
                },
                &fx.owner,
            )
            .await
            .unwrap();
        assert!(created.checklist.is_some());

        let templates = fx.repos.checklists().list_templates().await.unwrap();
        assert!(templates.iter().any(|t| t.name == "Vistoria rápida"));
    }

    #[tokio::test]
    async fn failed_bootstrap_writes_nothing() {
        let fx = Fixture::new().await;
        let svc = service(&fx);

        let unknown = svc
            .create(
                CreateServiceOrder {
                    template_id: Some("missing".into()),
                    ..input("Sem template")
                },
                &fx.owner,
            )
            .await
            .unwrap_err();
        assert!(matches!(unknown, DomainError::Validation(_)));

        let empty = svc
            .create(
                CreateServiceOrder {
                    new_checklist: Some(new_template("Vazio", &[])),
                    ..input("Sem itens")
                },
                &fx.owner,
            )
            .await
            .unwrap_err();
        assert!(matches!(empty, DomainError::Validation(_)));

        let page = svc.list(ServiceOrderQuery::default()).await.unwrap();
        assert_eq!(page.total, 0);
        assert!(fx.repos.checklists().list_templates().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn both_bootstrap_options_rejected() {
        let fx = Fixture::new().await;
        let svc = service(&fx);
        let tpl = fx.padrao_template().await;

        let err = svc
            .create(
                CreateServiceOrder {
                    template_id: Some(tpl.template.id),
                    new_checklist: Some(new_template("Outro", &[("Item um", true)])),
                    ..input("Ambos")
                },
                &fx.owner,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn list_filters_and_paginates() {
        let fx = Fixture::new().await;
        let svc = service(&fx);
        for title in ["Troca de HARDWARE", "Configuração de rede", "Hardware novo"] {
            svc.create(input(title), &fx.owner).await.unwrap();
        }
        let net = svc
            .list(ServiceOrderQuery {
                q: Some("rede".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        svc.update(&net.items[0].id, to_status(ServiceOrderStatus::Done), &fx.owner)
            .await
            .unwrap();

        let hw = svc
            .list(ServiceOrderQuery {
                q: Some("hardware".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(hw.total, 2);
        assert_eq!(hw.items[0].title, "Hardware novo");

        let done = svc
            .list(ServiceOrderQuery {
                status: Some(ServiceOrderStatus::Done),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(done.total, 1);

        let page2 = svc
            .list(ServiceOrderQuery {
                page: Some(2),
                limit: Some(2),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(page2.total, 3);
        assert_eq!(page2.items.len(), 1);

        let bad = svc
            .list(ServiceOrderQuery {
                limit: Some(101),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(bad, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn remove_cascades_and_checks_owner() {
        let fx = Fixture::new().await;
        let svc = service(&fx);
        let tpl = fx.padrao_template().await;
        let created = svc
            .create(
                CreateServiceOrder {
                    template_id: Some(tpl.template.id),
                    ..input("Para remover")
                },
                &fx.owner,
            )
            .await
            .unwrap();
        let id = created.order.id;

        assert!(matches!(
            svc.remove(&id, &fx.other).await.unwrap_err(),
            DomainError::Forbidden(_)
        ));
        svc.remove(&id, &fx.owner).await.unwrap();

        assert!(matches!(
            svc.get(&id).await.unwrap_err(),
            DomainError::NotFound { .. }
        ));
        assert!(fx
            .repos
            .checklists()
            .find_by_service_order(&id)
            .await
            .unwrap()
            .is_none());
        assert!(matches!(
            svc.remove(&id, &fx.owner).await.unwrap_err(),
            DomainError::NotFound { .. }
        ));
    }
}
