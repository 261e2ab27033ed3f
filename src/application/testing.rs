//! Shared fixtures for service tests: an in-memory store seeded with one
//! user per role and helpers for orders and templates.

use std::sync::Arc;

use crate::domain::{
    Actor, NewChecklistItem, NewChecklistTemplate, NewUser, RepositoryProvider, ServiceOrder,
    TemplateWithItems, UserRole,
};
use crate::domain::service_order::NewServiceOrder;
use crate::infrastructure::storage::InMemoryRepositoryProvider;

pub struct Fixture {
    pub repos: Arc<InMemoryRepositoryProvider>,
    /// TECH who creates the orders under test
    pub owner: Actor,
    /// VIEWER with no relation to the orders
    pub other: Actor,
    pub admin: Actor,
}

impl Fixture {
    pub async fn new() -> Self {
        let repos = Arc::new(InMemoryRepositoryProvider::new());
        let owner = add_user(&repos, "tech@example.com", UserRole::Tech).await;
        let other = add_user(&repos, "viewer@example.com", UserRole::Viewer).await;
        let admin = add_user(&repos, "admin@example.com", UserRole::Admin).await;
        Self {
            repos,
            owner,
            other,
            admin,
        }
    }

    pub fn provider(&self) -> Arc<dyn RepositoryProvider> {
        self.repos.clone()
    }

    pub async fn order_owned_by(&self, actor: &Actor) -> ServiceOrder {
        self.repos
            .service_orders()
            .create(
                NewServiceOrder {
                    title: "Instalação inicial".into(),
                    description: "Preparar ambiente".into(),
                    created_by_id: actor.id.clone(),
                },
                None,
            )
            .await
            .unwrap()
            .order
    }

    /// "Checklist Padrão": two required items and one optional.
    pub async fn padrao_template(&self) -> TemplateWithItems {
        self.template(
            "Checklist Padrão",
            &[
                ("Registrar horário de início", true),
                ("Validar ambiente/equipamentos", true),
                ("Observações finais", false),
            ],
        )
        .await
    }

    pub async fn template(&self, name: &str, items: &[(&str, bool)]) -> TemplateWithItems {
        self.repos
            .checklists()
            .create_template(new_template(name, items))
            .await
            .unwrap()
    }
}

pub fn new_template(name: &str, items: &[(&str, bool)]) -> NewChecklistTemplate {
    NewChecklistTemplate {
        name: name.into(),
        items: items
            .iter()
            .map(|(label, required)| NewChecklistItem {
                label: (*label).into(),
                required: *required,
            })
            .collect(),
    }
}

async fn add_user(repos: &InMemoryRepositoryProvider, email: &str, role: UserRole) -> Actor {
    let user = repos
        .users()
        .create(NewUser {
            name: email.into(),
            email: email.into(),
            password_hash: "not-a-real-hash".into(),
            role,
        })
        .await
        .unwrap();
    Actor::new(user.id, user.role)
}
