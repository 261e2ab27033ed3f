//! In-memory repository provider for development and testing
//!
//! All tables live behind one lock so multi-table writes (order + template +
//! instance, batch answer upserts, cascading deletes) are atomic the same way
//! a database transaction is.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::checklist::ChecklistRepository;
use crate::domain::photo::PhotoRepository;
use crate::domain::service_order::{
    CreatedServiceOrder, NewServiceOrder, ServiceOrderRepository,
};
use crate::domain::user::UserRepository;
use crate::domain::{
    AnswerInput, ChecklistAnswer, ChecklistBootstrap, ChecklistInstance, ChecklistItem,
    ChecklistTemplate, DomainError, DomainResult, NewChecklistTemplate, NewPhoto, NewUser, Photo,
    RepositoryProvider, ServiceOrder, ServiceOrderChanges, ServiceOrderFilter, ServiceOrderStatus,
    TemplateWithItems, User,
};
use crate::shared::PaginatedResult;

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    service_orders: Vec<ServiceOrder>,
    templates: Vec<ChecklistTemplate>,
    items: Vec<ChecklistItem>,
    instances: Vec<ChecklistInstance>,
    answers: Vec<ChecklistAnswer>,
    photos: Vec<Photo>,
}

impl Tables {
    fn insert_template(&mut self, input: NewChecklistTemplate) -> TemplateWithItems {
        let template = ChecklistTemplate {
            id: new_id(),
            name: input.name,
        };
        let items: Vec<ChecklistItem> = input
            .items
            .into_iter()
            .enumerate()
            .map(|(position, item)| ChecklistItem {
                id: new_id(),
                template_id: template.id.clone(),
                label: item.label,
                required: item.required,
                position: position as i32,
            })
            .collect();

        self.templates.push(template.clone());
        self.items.extend(items.iter().cloned());
        TemplateWithItems { template, items }
    }

    fn items_of(&self, template_id: &str) -> Vec<ChecklistItem> {
        let mut items: Vec<_> = self
            .items
            .iter()
            .filter(|i| i.template_id == template_id)
            .cloned()
            .collect();
        items.sort_by_key(|i| i.position);
        items
    }

    fn insert_instance(
        &mut self,
        service_order_id: &str,
        template_id: &str,
        started_at: DateTime<Utc>,
    ) -> DomainResult<ChecklistInstance> {
        if self
            .instances
            .iter()
            .any(|i| i.service_order_id == service_order_id)
        {
            return Err(DomainError::InvalidState("Checklist already started".into()));
        }
        let instance = ChecklistInstance {
            id: new_id(),
            service_order_id: service_order_id.to_string(),
            template_id: template_id.to_string(),
            started_at,
            finished_at: None,
        };
        self.instances.push(instance.clone());
        Ok(instance)
    }
}

/// In-memory implementation of every repository trait
#[derive(Default)]
pub struct InMemoryRepositoryProvider {
    tables: RwLock<Tables>,
}

impl InMemoryRepositoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.tables.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Tables> {
        self.tables.write().unwrap_or_else(|e| e.into_inner())
    }
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Newest first. Rows are stored in insertion order, so reversing before a
/// stable sort keeps the latest insert first among equal timestamps.
fn newest_first<T>(
    rows: impl DoubleEndedIterator<Item = T>,
    at: impl Fn(&T) -> DateTime<Utc>,
) -> Vec<T> {
    let mut rows: Vec<T> = rows.rev().collect();
    rows.sort_by(|a, b| at(b).cmp(&at(a)));
    rows
}

#[async_trait]
impl RepositoryProvider for InMemoryRepositoryProvider {
    fn users(&self) -> &dyn UserRepository {
        self
    }

    fn service_orders(&self) -> &dyn ServiceOrderRepository {
        self
    }

    fn checklists(&self) -> &dyn ChecklistRepository {
        self
    }

    fn photos(&self) -> &dyn PhotoRepository {
        self
    }

    async fn ping(&self) -> DomainResult<()> {
        Ok(())
    }
}

// ── Users ───────────────────────────────────────────────────────

#[async_trait]
impl UserRepository for InMemoryRepositoryProvider {
    async fn create(&self, user: NewUser) -> DomainResult<User> {
        let mut t = self.write();
        if t.users.iter().any(|u| u.email == user.email) {
            return Err(DomainError::Conflict("Email already in use".into()));
        }
        let user = User {
            id: new_id(),
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            role: user.role,
            created_at: Utc::now(),
        };
        t.users.push(user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        Ok(self.read().users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<User>> {
        Ok(self.read().users.iter().find(|u| u.id == id).cloned())
    }

    async fn count(&self) -> DomainResult<u64> {
        Ok(self.read().users.len() as u64)
    }
}

// ── Service orders ──────────────────────────────────────────────

#[async_trait]
impl ServiceOrderRepository for InMemoryRepositoryProvider {
    async fn list(&self, filter: ServiceOrderFilter) -> DomainResult<PaginatedResult<ServiceOrder>> {
        let t = self.read();
        let needle = filter.q.as_ref().map(|q| q.to_lowercase());

        let matching = t.service_orders.iter().filter(|so| {
            filter.status.map_or(true, |s| so.status == s)
                && needle.as_ref().map_or(true, |q| {
                    so.title.to_lowercase().contains(q) || so.description.to_lowercase().contains(q)
                })
        });
        let sorted = newest_first(matching.cloned(), |so| so.created_at);

        let total = sorted.len() as u64;
        let items = sorted
            .into_iter()
            .skip(filter.pagination.offset() as usize)
            .take(filter.pagination.limit as usize)
            .collect();
        Ok(PaginatedResult::new(items, total))
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<ServiceOrder>> {
        Ok(self.read().service_orders.iter().find(|so| so.id == id).cloned())
    }

    async fn create(
        &self,
        order: NewServiceOrder,
        bootstrap: Option<ChecklistBootstrap>,
    ) -> DomainResult<CreatedServiceOrder> {
        let mut t = self.write();

        if let Some(ChecklistBootstrap::Existing { template_id }) = &bootstrap {
            if t.items_of(template_id).is_empty() {
                return Err(DomainError::Validation("Invalid or empty template".into()));
            }
        }

        let now = Utc::now();
        let order = ServiceOrder {
            id: new_id(),
            title: order.title,
            description: order.description,
            status: ServiceOrderStatus::Open,
            created_by_id: order.created_by_id,
            created_at: now,
            updated_at: now,
        };

        let template_id = match bootstrap {
            None => None,
            Some(ChecklistBootstrap::Existing { template_id }) => Some(template_id),
            Some(ChecklistBootstrap::Create(new_template)) => {
                Some(t.insert_template(new_template).template.id)
            }
        };

        t.service_orders.push(order.clone());
        let checklist = match template_id {
            Some(template_id) => Some(t.insert_instance(&order.id, &template_id, now)?),
            None => None,
        };

        Ok(CreatedServiceOrder { order, checklist })
    }

    async fn update(&self, id: &str, changes: ServiceOrderChanges) -> DomainResult<ServiceOrder> {
        let mut t = self.write();
        let so = t
            .service_orders
            .iter_mut()
            .find(|so| so.id == id)
            .ok_or_else(|| DomainError::not_found("ServiceOrder", id))?;

        if let Some(title) = changes.title {
            so.title = title;
        }
        if let Some(description) = changes.description {
            so.description = description;
        }
        if let Some(status) = changes.status {
            so.status = status;
        }
        so.updated_at = Utc::now();
        Ok(so.clone())
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        let mut t = self.write();
        let before = t.service_orders.len();
        t.service_orders.retain(|so| so.id != id);
        if t.service_orders.len() == before {
            return Err(DomainError::not_found("ServiceOrder", id));
        }

        let instance_ids: Vec<String> = t
            .instances
            .iter()
            .filter(|i| i.service_order_id == id)
            .map(|i| i.id.clone())
            .collect();
        t.answers
            .retain(|a| !instance_ids.contains(&a.so_checklist_id));
        t.instances.retain(|i| i.service_order_id != id);
        t.photos.retain(|p| p.service_order_id != id);
        Ok(())
    }
}

// ── Checklists ──────────────────────────────────────────────────

#[async_trait]
impl ChecklistRepository for InMemoryRepositoryProvider {
    async fn list_templates(&self) -> DomainResult<Vec<ChecklistTemplate>> {
        let mut templates = self.read().templates.clone();
        templates.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(templates)
    }

    async fn find_template(&self, id: &str) -> DomainResult<Option<ChecklistTemplate>> {
        Ok(self.read().templates.iter().find(|t| t.id == id).cloned())
    }

    async fn template_items(&self, template_id: &str) -> DomainResult<Vec<ChecklistItem>> {
        Ok(self.read().items_of(template_id))
    }

    async fn create_template(
        &self,
        template: NewChecklistTemplate,
    ) -> DomainResult<TemplateWithItems> {
        Ok(self.write().insert_template(template))
    }

    async fn find_by_service_order(
        &self,
        service_order_id: &str,
    ) -> DomainResult<Option<ChecklistInstance>> {
        Ok(self
            .read()
            .instances
            .iter()
            .find(|i| i.service_order_id == service_order_id)
            .cloned())
    }

    async fn start(
        &self,
        service_order_id: &str,
        template_id: &str,
        started_at: DateTime<Utc>,
    ) -> DomainResult<ChecklistInstance> {
        self.write()
            .insert_instance(service_order_id, template_id, started_at)
    }

    async fn finish(
        &self,
        instance_id: &str,
        finished_at: DateTime<Utc>,
    ) -> DomainResult<ChecklistInstance> {
        let mut t = self.write();
        let instance = t
            .instances
            .iter_mut()
            .find(|i| i.id == instance_id)
            .ok_or_else(|| DomainError::not_found("ServiceOrderChecklist", instance_id))?;
        instance.finished_at = Some(finished_at);
        Ok(instance.clone())
    }

    async fn answers(&self, instance_id: &str) -> DomainResult<Vec<ChecklistAnswer>> {
        Ok(self
            .read()
            .answers
            .iter()
            .filter(|a| a.so_checklist_id == instance_id)
            .cloned()
            .collect())
    }

    async fn upsert_answers(
        &self,
        instance_id: &str,
        inputs: Vec<AnswerInput>,
    ) -> DomainResult<Vec<ChecklistAnswer>> {
        let mut t = self.write();
        let mut written = Vec::with_capacity(inputs.len());

        for input in inputs {
            let existing = t
                .answers
                .iter_mut()
                .find(|a| a.so_checklist_id == instance_id && a.item_id == input.item_id);
            let answer = match existing {
                Some(answer) => {
                    answer.bool_value = input.bool_value;
                    answer.text_value = input.text_value;
                    answer.note = input.note;
                    answer.clone()
                }
                None => {
                    let answer = ChecklistAnswer {
                        id: new_id(),
                        so_checklist_id: instance_id.to_string(),
                        item_id: input.item_id,
                        bool_value: input.bool_value,
                        text_value: input.text_value,
                        note: input.note,
                    };
                    t.answers.push(answer.clone());
                    answer
                }
            };
            written.push(answer);
        }
        Ok(written)
    }
}

// ── Photos ──────────────────────────────────────────────────────

#[async_trait]
impl PhotoRepository for InMemoryRepositoryProvider {
    async fn create(&self, photo: NewPhoto) -> DomainResult<Photo> {
        let photo = Photo {
            id: new_id(),
            service_order_id: photo.service_order_id,
            key: photo.key,
            mime_type: photo.mime_type,
            size: photo.size,
            taken_at: Utc::now(),
        };
        self.write().photos.push(photo.clone());
        Ok(photo)
    }

    async fn list_by_service_order(&self, service_order_id: &str) -> DomainResult<Vec<Photo>> {
        let t = self.read();
        let rows = t
            .photos
            .iter()
            .filter(|p| p.service_order_id == service_order_id)
            .cloned();
        Ok(newest_first(rows, |p| p.taken_at))
    }

    async fn count_by_service_order(&self, service_order_id: &str) -> DomainResult<u64> {
        Ok(self
            .read()
            .photos
            .iter()
            .filter(|p| p.service_order_id == service_order_id)
            .count() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{NewChecklistItem, UserRole};

    fn new_order(owner: &str) -> NewServiceOrder {
        NewServiceOrder {
            title: "Ordem".into(),
            description: String::new(),
            created_by_id: owner.into(),
        }
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let repo = InMemoryRepositoryProvider::new();
        let user = NewUser {
            name: "A".into(),
            email: "a@example.com".into(),
            password_hash: "h".into(),
            role: UserRole::Tech,
        };
        repo.users().create(user.clone()).await.unwrap();
        assert!(matches!(
            repo.users().create(user).await.unwrap_err(),
            DomainError::Conflict(_)
        ));
        assert_eq!(repo.users().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn second_instance_for_order_rejected() {
        let repo = InMemoryRepositoryProvider::new();
        let so = repo
            .service_orders()
            .create(new_order("u"), None)
            .await
            .unwrap()
            .order;
        repo.checklists().start(&so.id, "tpl", Utc::now()).await.unwrap();
        assert!(matches!(
            repo.checklists().start(&so.id, "tpl", Utc::now()).await.unwrap_err(),
            DomainError::InvalidState(_)
        ));
    }

    #[tokio::test]
    async fn create_with_new_template_is_atomic_unit() {
        let repo = InMemoryRepositoryProvider::new();
        let bootstrap = ChecklistBootstrap::Create(NewChecklistTemplate {
            name: "Novo".into(),
            items: vec![
                NewChecklistItem {
                    label: "Primeiro".into(),
                    required: true,
                },
                NewChecklistItem {
                    label: "Segundo".into(),
                    required: false,
                },
            ],
        });
        let created = repo
            .service_orders()
            .create(new_order("u"), Some(bootstrap))
            .await
            .unwrap();

        let instance = created.checklist.unwrap();
        let items = repo.checklists().template_items(&instance.template_id).await.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].label, "Primeiro");
        assert_eq!(items[1].position, 1);
    }

    #[tokio::test]
    async fn unknown_bootstrap_template_leaves_no_order() {
        let repo = InMemoryRepositoryProvider::new();
        let result = repo
            .service_orders()
            .create(
                new_order("u"),
                Some(ChecklistBootstrap::Existing {
                    template_id: "missing".into(),
                }),
            )
            .await;
        assert!(result.is_err());

        let page = repo
            .service_orders()
            .list(ServiceOrderFilter::default())
            .await
            .unwrap();
        assert_eq!(page.total, 0);
    }

    #[tokio::test]
    async fn delete_cascades_to_children() {
        let repo = InMemoryRepositoryProvider::new();
        let so = repo
            .service_orders()
            .create(new_order("u"), None)
            .await
            .unwrap()
            .order;
        let inst = repo.checklists().start(&so.id, "tpl", Utc::now()).await.unwrap();
        repo.checklists()
            .upsert_answers(
                &inst.id,
                vec![AnswerInput {
                    item_id: "i".into(),
                    bool_value: Some(true),
                    ..Default::default()
                }],
            )
            .await
            .unwrap();
        repo.photos()
            .create(NewPhoto {
                service_order_id: so.id.clone(),
                key: "os/x.jpg".into(),
                mime_type: "image/jpeg".into(),
                size: 1,
            })
            .await
            .unwrap();

        repo.service_orders().delete(&so.id).await.unwrap();

        assert!(repo.checklists().answers(&inst.id).await.unwrap().is_empty());
        assert_eq!(repo.photos().count_by_service_order(&so.id).await.unwrap(), 0);
        assert!(repo.checklists().find_by_service_order(&so.id).await.unwrap().is_none());
    }
}
