use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{
    AnswerInput, ChecklistAnswer, ChecklistInstance, ChecklistItem, ChecklistTemplate,
    NewChecklistTemplate, TemplateWithItems,
};
use crate::domain::DomainResult;

#[async_trait]
pub trait ChecklistRepository: Send + Sync {
    // Templates

    /// All templates ordered by name.
    async fn list_templates(&self) -> DomainResult<Vec<ChecklistTemplate>>;
    async fn find_template(&self, id: &str) -> DomainResult<Option<ChecklistTemplate>>;
    /// Items of a template in `position` order. Unknown template yields empty.
    async fn template_items(&self, template_id: &str) -> DomainResult<Vec<ChecklistItem>>;
    async fn create_template(&self, template: NewChecklistTemplate)
        -> DomainResult<TemplateWithItems>;

    // Instances

    async fn find_by_service_order(
        &self,
        service_order_id: &str,
    ) -> DomainResult<Option<ChecklistInstance>>;

    /// Create the instance. A second instance for the same order fails with
    /// `InvalidState`.
    async fn start(
        &self,
        service_order_id: &str,
        template_id: &str,
        started_at: DateTime<Utc>,
    ) -> DomainResult<ChecklistInstance>;

    async fn finish(
        &self,
        instance_id: &str,
        finished_at: DateTime<Utc>,
    ) -> DomainResult<ChecklistInstance>;

    // Answers

    async fn answers(&self, instance_id: &str) -> DomainResult<Vec<ChecklistAnswer>>;

    /// Insert or overwrite one answer per input, all or nothing.
    async fn upsert_answers(
        &self,
        instance_id: &str,
        inputs: Vec<AnswerInput>,
    ) -> DomainResult<Vec<ChecklistAnswer>>;
}
