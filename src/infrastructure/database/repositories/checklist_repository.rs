use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, QueryFilter, QueryOrder, Set, TransactionTrait,
};

use super::{db_err, is_unique_violation, new_id};
use crate::domain::checklist::ChecklistRepository;
use crate::domain::{
    AnswerInput, ChecklistAnswer, ChecklistInstance, ChecklistItem, ChecklistTemplate,
    DomainError, DomainResult, NewChecklistTemplate, TemplateWithItems,
};
use crate::infrastructure::database::entities::{
    checklist_answer, checklist_item, checklist_template, service_order_checklist,
};

pub struct SeaOrmChecklistRepository {
    db: DatabaseConnection,
}

impl SeaOrmChecklistRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn template_model_to_domain(model: checklist_template::Model) -> ChecklistTemplate {
    ChecklistTemplate {
        id: model.id,
        name: model.name,
    }
}

fn item_model_to_domain(model: checklist_item::Model) -> ChecklistItem {
    ChecklistItem {
        id: model.id,
        template_id: model.template_id,
        label: model.label,
        required: model.required,
        position: model.position,
    }
}

fn instance_model_to_domain(model: service_order_checklist::Model) -> ChecklistInstance {
    ChecklistInstance {
        id: model.id,
        service_order_id: model.service_order_id,
        template_id: model.template_id,
        started_at: model.started_at,
        finished_at: model.finished_at,
    }
}

fn answer_model_to_domain(model: checklist_answer::Model) -> ChecklistAnswer {
    ChecklistAnswer {
        id: model.id,
        so_checklist_id: model.so_checklist_id,
        item_id: model.item_id,
        bool_value: model.bool_value,
        text_value: model.text_value,
        note: model.note,
    }
}

// ── Connection-generic writes, shared with the service order create
//    transaction ─────────────────────────────────────────────────

pub(super) async fn items_of<C: ConnectionTrait>(
    conn: &C,
    template_id: &str,
) -> DomainResult<Vec<ChecklistItem>> {
    let models = checklist_item::Entity::find()
        .filter(checklist_item::Column::TemplateId.eq(template_id))
        .order_by_asc(checklist_item::Column::Position)
        .all(conn)
        .await
        .map_err(db_err)?;
    Ok(models.into_iter().map(item_model_to_domain).collect())
}

pub(super) async fn insert_template<C: ConnectionTrait>(
    conn: &C,
    input: NewChecklistTemplate,
) -> DomainResult<TemplateWithItems> {
    let template = checklist_template::ActiveModel {
        id: Set(new_id()),
        name: Set(input.name),
    }
    .insert(conn)
    .await
    .map_err(db_err)?;

    let mut items = Vec::with_capacity(input.items.len());
    for (position, item) in input.items.into_iter().enumerate() {
        let model = checklist_item::ActiveModel {
            id: Set(new_id()),
            template_id: Set(template.id.clone()),
            label: Set(item.label),
            required: Set(item.required),
            position: Set(position as i32),
        }
        .insert(conn)
        .await
        .map_err(db_err)?;
        items.push(item_model_to_domain(model));
    }

    Ok(TemplateWithItems {
        template: template_model_to_domain(template),
        items,
    })
}

pub(super) async fn insert_instance<C: ConnectionTrait>(
    conn: &C,
    service_order_id: &str,
    template_id: &str,
    started_at: DateTime<Utc>,
) -> DomainResult<ChecklistInstance> {
    let model = service_order_checklist::ActiveModel {
        id: Set(new_id()),
        service_order_id: Set(service_order_id.to_string()),
        template_id: Set(template_id.to_string()),
        started_at: Set(started_at),
        finished_at: Set(None),
    }
    .insert(conn)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            DomainError::InvalidState("Checklist already started".to_string())
        } else {
            db_err(e)
        }
    })?;
    Ok(instance_model_to_domain(model))
}

// ── Repository implementation ───────────────────────────────────

#[async_trait]
impl ChecklistRepository for SeaOrmChecklistRepository {
    async fn list_templates(&self) -> DomainResult<Vec<ChecklistTemplate>> {
        let models = checklist_template::Entity::find()
            .order_by_asc(checklist_template::Column::Name)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(template_model_to_domain).collect())
    }

    async fn find_template(&self, id: &str) -> DomainResult<Option<ChecklistTemplate>> {
        let model = checklist_template::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(template_model_to_domain))
    }

    async fn template_items(&self, template_id: &str) -> DomainResult<Vec<ChecklistItem>> {
        items_of(&self.db, template_id).await
    }

    async fn create_template(
        &self,
        template: NewChecklistTemplate,
    ) -> DomainResult<TemplateWithItems> {
        let txn = self.db.begin().await.map_err(db_err)?;
        let created = insert_template(&txn, template).await?;
        txn.commit().await.map_err(db_err)?;
        Ok(created)
    }

    async fn find_by_service_order(
        &self,
        service_order_id: &str,
    ) -> DomainResult<Option<ChecklistInstance>> {
        let model = service_order_checklist::Entity::find()
            .filter(service_order_checklist::Column::ServiceOrderId.eq(service_order_id))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(instance_model_to_domain))
    }

    async fn start(
        &self,
        service_order_id: &str,
        template_id: &str,
        started_at: DateTime<Utc>,
    ) -> DomainResult<ChecklistInstance> {
        insert_instance(&self.db, service_order_id, template_id, started_at).await
    }

    async fn finish(
        &self,
        instance_id: &str,
        finished_at: DateTime<Utc>,
    ) -> DomainResult<ChecklistInstance> {
        let model = service_order_checklist::Entity::find_by_id(instance_id.to_string())
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or_else(|| DomainError::not_found("ServiceOrderChecklist", instance_id))?;

        let mut active = model.into_active_model();
        active.finished_at = Set(Some(finished_at));
        let updated = active.update(&self.db).await.map_err(db_err)?;
        Ok(instance_model_to_domain(updated))
    }

    async fn answers(&self, instance_id: &str) -> DomainResult<Vec<ChecklistAnswer>> {
        let models = checklist_answer::Entity::find()
            .filter(checklist_answer::Column::SoChecklistId.eq(instance_id))
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(answer_model_to_domain).collect())
    }

    async fn upsert_answers(
        &self,
        instance_id: &str,
        inputs: Vec<AnswerInput>,
    ) -> DomainResult<Vec<ChecklistAnswer>> {
        let txn = self.db.begin().await.map_err(db_err)?;
        let mut written = Vec::with_capacity(inputs.len());

        for input in inputs {
            let existing = checklist_answer::Entity::find()
                .filter(checklist_answer::Column::SoChecklistId.eq(instance_id))
                .filter(checklist_answer::Column::ItemId.eq(input.item_id.as_str()))
                .one(&txn)
                .await
                .map_err(db_err)?;

            let model = match existing {
                Some(model) => {
                    let mut active = model.into_active_model();
                    active.bool_value = Set(input.bool_value);
                    active.text_value = Set(input.text_value);
                    active.note = Set(input.note);
                    active.update(&txn).await.map_err(db_err)?
                }
                None => checklist_answer::ActiveModel {
                    id: Set(new_id()),
                    so_checklist_id: Set(instance_id.to_string()),
                    item_id: Set(input.item_id),
                    bool_value: Set(input.bool_value),
                    text_value: Set(input.text_value),
                    note: Set(input.note),
                }
                .insert(&txn)
                .await
                .map_err(db_err)?,
            };
            written.push(answer_model_to_domain(model));
        }

        txn.commit().await.map_err(db_err)?;
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::service_order::{NewServiceOrder, ServiceOrderRepository};
    use crate::domain::user::UserRepository;
    use crate::domain::{NewChecklistItem, NewUser, UserRole};
    use crate::infrastructure::database::repositories::{
        test_db, SeaOrmServiceOrderRepository, SeaOrmUserRepository,
    };

    async fn setup() -> (SeaOrmChecklistRepository, String, TemplateWithItems) {
        let db = test_db().await;
        let owner = SeaOrmUserRepository::new(db.clone())
            .create(NewUser {
                name: "Tech".into(),
                email: "tech@example.com".into(),
                password_hash: "h".into(),
                role: UserRole::Tech,
            })
            .await
            .unwrap();
        let order = SeaOrmServiceOrderRepository::new(db.clone())
            .create(
                NewServiceOrder {
                    title: "Instalação".into(),
                    description: String::new(),
                    created_by_id: owner.id,
                },
                None,
            )
            .await
            .unwrap()
            .order;

        let repo = SeaOrmChecklistRepository::new(db);
        let template = repo
            .create_template(NewChecklistTemplate {
                name: "Checklist Padrão".into(),
                items: vec![
                    NewChecklistItem {
                        label: "Registrar horário de início".into(),
                        required: true,
                    },
                    NewChecklistItem {
                        label: "Observações finais".into(),
                        required: false,
                    },
                ],
            })
            .await
            .unwrap();
        (repo, order.id, template)
    }

    #[tokio::test]
    async fn items_come_back_in_position_order() {
        let (repo, _, template) = setup().await;
        let items = repo.template_items(&template.template.id).await.unwrap();
        let labels: Vec<_> = items.iter().map(|i| i.label.as_str()).collect();
        assert_eq!(labels, vec!["Registrar horário de início", "Observações finais"]);
        assert!(repo.template_items("unknown").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unique_index_rejects_second_instance() {
        let (repo, order_id, template) = setup().await;
        repo.start(&order_id, &template.template.id, Utc::now())
            .await
            .unwrap();
        let err = repo
            .start(&order_id, &template.template.id, Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidState(_)));
    }

    #[tokio::test]
    async fn upsert_overwrites_existing_answer() {
        let (repo, order_id, template) = setup().await;
        let inst = repo
            .start(&order_id, &template.template.id, Utc::now())
            .await
            .unwrap();
        let item_id = template.items[0].id.clone();

        repo.upsert_answers(
            &inst.id,
            vec![AnswerInput {
                item_id: item_id.clone(),
                bool_value: Some(true),
                text_value: None,
                note: Some("primeira".into()),
            }],
        )
        .await
        .unwrap();
        repo.upsert_answers(
            &inst.id,
            vec![AnswerInput {
                item_id,
                bool_value: Some(false),
                ..Default::default()
            }],
        )
        .await
        .unwrap();

        let answers = repo.answers(&inst.id).await.unwrap();
        assert_eq!(answers.len(), 1);
        assert_eq!(answers[0].bool_value, Some(false));
        assert_eq!(answers[0].note, None);
    }

    #[tokio::test]
    async fn finish_stamps_finished_at() {
        let (repo, order_id, template) = setup().await;
        let inst = repo
            .start(&order_id, &template.template.id, Utc::now())
            .await
            .unwrap();
        let finished = repo.finish(&inst.id, Utc::now()).await.unwrap();
        assert!(finished.finished_at.is_some());

        let found = repo.find_by_service_order(&order_id).await.unwrap().unwrap();
        assert!(found.is_finished());
    }
}
