//! Checklist lifecycle service
//!
//! Owns the instance state machine for a service order:
//! no instance → started (`finished_at` unset) → finished. Every mutation
//! resolves the owning service order and runs the ownership check before
//! touching the store, and runs under the order's lock.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use super::locks::ChecklistLocks;
use crate::domain::checklist::{foreign_items, missing_required_items};
use crate::domain::{
    ensure_owner_or_admin, Actor, AnswerInput, ChecklistAnswer, ChecklistDetail,
    ChecklistInstance, ChecklistTemplate, DomainError, DomainResult, NewChecklistItem,
    NewChecklistTemplate, RepositoryProvider, ServiceOrder, TemplateWithItems,
};

/// Trim and check a template definition: name and every label at least two
/// characters, at least one item.
pub fn validate_new_template(input: NewChecklistTemplate) -> DomainResult<NewChecklistTemplate> {
    let name = input.name.trim().to_string();
    if name.chars().count() < 2 {
        return Err(DomainError::Validation(
            "Template name must be at least 2 characters".into(),
        ));
    }
    if input.items.is_empty() {
        return Err(DomainError::Validation(
            "Template must have at least one item".into(),
        ));
    }

    let items = input
        .items
        .into_iter()
        .map(|item| {
            let label = item.label.trim().to_string();
            if label.chars().count() < 2 {
                return Err(DomainError::Validation(
                    "Item label must be at least 2 characters".into(),
                ));
            }
            Ok(NewChecklistItem {
                label,
                required: item.required,
            })
        })
        .collect::<DomainResult<Vec<_>>>()?;

    Ok(NewChecklistTemplate { name, items })
}

pub struct ChecklistService {
    repos: Arc<dyn RepositoryProvider>,
    locks: ChecklistLocks,
}

impl ChecklistService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self {
            repos,
            locks: ChecklistLocks::new(),
        }
    }

    // ── Templates ───────────────────────────────────────────────

    pub async fn list_templates(&self) -> DomainResult<Vec<ChecklistTemplate>> {
        self.repos.checklists().list_templates().await
    }

    pub async fn create_template(
        &self,
        input: NewChecklistTemplate,
    ) -> DomainResult<TemplateWithItems> {
        let input = validate_new_template(input)?;
        let created = self.repos.checklists().create_template(input).await?;
        info!(
            template_id = %created.template.id,
            items = created.items.len(),
            "Checklist template created"
        );
        Ok(created)
    }

    // ── Queries ─────────────────────────────────────────────────

    /// Template, items and answers of the order's checklist, `None` when
    /// no checklist was started.
    pub async fn get_detail_for_so(
        &self,
        service_order_id: &str,
    ) -> DomainResult<Option<ChecklistDetail>> {
        let checklists = self.repos.checklists();
        let Some(instance) = checklists.find_by_service_order(service_order_id).await? else {
            return Ok(None);
        };

        let template = checklists
            .find_template(&instance.template_id)
            .await?
            .ok_or_else(|| DomainError::not_found("ChecklistTemplate", &instance.template_id))?;
        let items = checklists.template_items(&instance.template_id).await?;
        let answers = checklists.answers(&instance.id).await?;

        Ok(Some(ChecklistDetail {
            instance,
            template,
            items,
            answers,
        }))
    }

    // ── Lifecycle ───────────────────────────────────────────────

    pub async fn start(
        &self,
        service_order_id: &str,
        template_id: &str,
        actor: &Actor,
    ) -> DomainResult<ChecklistInstance> {
        let _guard = self.locks.acquire(service_order_id).await;

        let order = self.load_order(service_order_id).await?;
        ensure_owner_or_admin(actor, &order.created_by_id)?;

        let checklists = self.repos.checklists();
        if checklists
            .find_by_service_order(service_order_id)
            .await?
            .is_some()
        {
            return Err(DomainError::InvalidState("Checklist already started".into()));
        }

        if checklists.template_items(template_id).await?.is_empty() {
            return Err(DomainError::Validation("Invalid or empty template".into()));
        }

        let instance = checklists
            .start(service_order_id, template_id, Utc::now())
            .await?;
        info!(
            service_order_id,
            template_id,
            actor_id = %actor.id,
            "Checklist started"
        );
        Ok(instance)
    }

    /// Upsert a batch of answers. Any item outside the template rejects the
    /// whole batch before a single write.
    pub async fn patch_answers(
        &self,
        service_order_id: &str,
        inputs: Vec<AnswerInput>,
        actor: &Actor,
    ) -> DomainResult<Vec<ChecklistAnswer>> {
        let _guard = self.locks.acquire(service_order_id).await;

        let instance = self.open_instance_for(service_order_id, actor).await?;

        let checklists = self.repos.checklists();
        let items = checklists.template_items(&instance.template_id).await?;
        if let Some(foreign) = foreign_items(&items, &inputs).first() {
            return Err(DomainError::Validation(format!(
                "Item does not belong to template: {}",
                foreign
            )));
        }

        let count = inputs.len();
        let answers = checklists.upsert_answers(&instance.id, inputs).await?;
        debug!(service_order_id, answers = count, "Checklist answers upserted");
        Ok(answers)
    }

    pub async fn finish(
        &self,
        service_order_id: &str,
        actor: &Actor,
    ) -> DomainResult<ChecklistInstance> {
        let _guard = self.locks.acquire(service_order_id).await;

        let instance = self.open_instance_for(service_order_id, actor).await?;

        let checklists = self.repos.checklists();
        let items = checklists.template_items(&instance.template_id).await?;
        let answers = checklists.answers(&instance.id).await?;
        let missing = missing_required_items(&items, &answers);
        if !missing.is_empty() {
            debug!(service_order_id, missing = missing.len(), "Checklist finish refused");
            return Err(DomainError::InvalidState("Required items missing".into()));
        }

        let finished = checklists.finish(&instance.id, Utc::now()).await?;
        metrics::counter!("fieldops_checklists_finished_total").increment(1);
        info!(service_order_id, actor_id = %actor.id, "Checklist finished");
        Ok(finished)
    }

    // ── Helpers ─────────────────────────────────────────────────

    async fn load_order(&self, service_order_id: &str) -> DomainResult<ServiceOrder> {
        self.repos
            .service_orders()
            .find_by_id(service_order_id)
            .await?
            .ok_or_else(|| DomainError::not_found("ServiceOrder", service_order_id))
    }

    /// The started, unfinished instance, after the ownership check.
    async fn open_instance_for(
        &self,
        service_order_id: &str,
        actor: &Actor,
    ) -> DomainResult<ChecklistInstance> {
        let instance = self
            .repos
            .checklists()
            .find_by_service_order(service_order_id)
            .await?
            .ok_or_else(|| DomainError::InvalidState("Checklist not started".into()))?;

        let order = self.load_order(service_order_id).await?;
        ensure_owner_or_admin(actor, &order.created_by_id)?;

        if instance.is_finished() {
            return Err(DomainError::InvalidState(
                "Checklist already finished".into(),
            ));
        }
        Ok(instance)
    }
}
