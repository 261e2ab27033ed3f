//! Demo data: one user per role, two templates, a handful of orders and one
//! checklist in progress. Safe to run repeatedly.

use tracing::info;

use crate::domain::service_order::NewServiceOrder;
use crate::domain::{
    AnswerInput, ChecklistBootstrap, DomainError, DomainResult, NewChecklistItem,
    NewChecklistTemplate, NewUser, RepositoryProvider, ServiceOrderChanges, ServiceOrderStatus,
    User, UserRole,
};
use crate::infrastructure::crypto::password::hash_password_with_cost;

const SEED_USERS: &[(&str, &str, &str, UserRole)] = &[
    ("Admin", "admin@example.com", "admin123", UserRole::Admin),
    ("Manager", "manager@example.com", "manager123", UserRole::Manager),
    ("Técnico", "tech@example.com", "tech123", UserRole::Tech),
    ("Viewer", "viewer@example.com", "viewer123", UserRole::Viewer),
];

const PADRAO: &[(&str, bool)] = &[
    ("Registrar horário de início", true),
    ("Validar ambiente/equipamentos", true),
    ("Observações finais", false),
];

const INSTALACAO: &[(&str, bool)] = &[
    ("Conferir tensão de alimentação", true),
    ("Fixar equipamento no rack", true),
    ("Configurar IP e hostname", true),
    ("Checklist visual de cabos", false),
];

#[derive(Debug, Default)]
pub struct SeedReport {
    pub users: usize,
    pub templates: usize,
    pub service_orders: usize,
}

/// Insert the demo data set. Skips users that already exist and skips the
/// templates and orders when any template is already present.
pub async fn seed(repos: &dyn RepositoryProvider, password_cost: u32) -> DomainResult<SeedReport> {
    let mut report = SeedReport::default();

    let mut users = Vec::with_capacity(SEED_USERS.len());
    for (name, email, password, role) in SEED_USERS {
        let user = match repos.users().find_by_email(email).await? {
            Some(existing) => existing,
            None => {
                let password_hash = hash_password_with_cost(password, password_cost)
                    .map_err(|e| DomainError::Storage(format!("Failed to hash password: {}", e)))?;
                report.users += 1;
                repos
                    .users()
                    .create(NewUser {
                        name: (*name).to_string(),
                        email: (*email).to_string(),
                        password_hash,
                        role: *role,
                    })
                    .await?
            }
        };
        users.push(user);
    }

    if !repos.checklists().list_templates().await?.is_empty() {
        info!(users = report.users, "Seed: templates present, skipping orders");
        return Ok(report);
    }

    let padrao = repos
        .checklists()
        .create_template(template("Checklist Padrão", PADRAO))
        .await?;
    let instalacao = repos
        .checklists()
        .create_template(template("Instalação de Equipamento", INSTALACAO))
        .await?;
    report.templates = 2;

    let admin = &users[0];
    let tech = &users[2];

    let orders: [(&str, &str, ServiceOrderStatus, &User, Option<&str>); 5] = [
        (
            "Instalação inicial",
            "Preparar ambiente e validar acesso.",
            ServiceOrderStatus::Open,
            admin,
            Some(padrao.template.id.as_str()),
        ),
        (
            "Troca de hardware",
            "Substituir fonte de alimentação do servidor.",
            ServiceOrderStatus::InProgress,
            tech,
            Some(instalacao.template.id.as_str()),
        ),
        (
            "Configuração de rede",
            "Ajustar VLANs e rotas do switch principal.",
            ServiceOrderStatus::Done,
            admin,
            None,
        ),
        (
            "Atualização de firmware",
            "Aplicar a versão mais recente do firmware.",
            ServiceOrderStatus::Open,
            tech,
            None,
        ),
        (
            "Auditoria de segurança",
            "Revisar acessos e logs do último trimestre.",
            ServiceOrderStatus::InProgress,
            admin,
            None,
        ),
    ];

    for (title, description, status, owner, template_id) in orders {
        let created = repos
            .service_orders()
            .create(
                NewServiceOrder {
                    title: title.to_string(),
                    description: description.to_string(),
                    created_by_id: owner.id.clone(),
                },
                template_id.map(|id| ChecklistBootstrap::Existing {
                    template_id: id.to_string(),
                }),
            )
            .await?;
        report.service_orders += 1;

        if status != ServiceOrderStatus::Open {
            repos
                .service_orders()
                .update(
                    &created.order.id,
                    ServiceOrderChanges {
                        status: Some(status),
                        ..Default::default()
                    },
                )
                .await?;
        }

        // The in-progress installation has its first two items done.
        if let Some(instance) = created.checklist.filter(|i| i.template_id == instalacao.template.id) {
            let answers = instalacao
                .items
                .iter()
                .take(2)
                .map(|item| AnswerInput {
                    item_id: item.id.clone(),
                    bool_value: Some(true),
                    text_value: Some("OK".into()),
                    note: Some("Verificado durante a visita".into()),
                })
                .collect();
            repos.checklists().upsert_answers(&instance.id, answers).await?;
        }
    }

    info!(
        users = report.users,
        templates = report.templates,
        service_orders = report.service_orders,
        "Seed data inserted"
    );
    Ok(report)
}

fn template(name: &str, items: &[(&str, bool)]) -> NewChecklistTemplate {
    NewChecklistTemplate {
        name: name.to_string(),
        items: items
            .iter()
            .map(|(label, required)| NewChecklistItem {
                label: (*label).to_string(),
                required: *required,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ServiceOrderFilter;
    use crate::infrastructure::storage::InMemoryRepositoryProvider;

    #[tokio::test]
    async fn seed_is_idempotent() {
        let repos = InMemoryRepositoryProvider::new();
        let first = seed(&repos, 4).await.unwrap();
        assert_eq!(first.users, 4);
        assert_eq!(first.templates, 2);
        assert_eq!(first.service_orders, 5);

        let second = seed(&repos, 4).await.unwrap();
        assert_eq!(second.users, 0);
        assert_eq!(second.service_orders, 0);

        let page = repos
            .service_orders()
            .list(ServiceOrderFilter::default())
            .await
            .unwrap();
        assert_eq!(page.total, 5);
    }

    #[tokio::test]
    async fn seeded_checklist_has_two_answers() {
        let repos = InMemoryRepositoryProvider::new();
        seed(&repos, 4).await.unwrap();

        let page = repos
            .service_orders()
            .list(ServiceOrderFilter {
                q: Some("Troca de hardware".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        let order = &page.items[0];
        assert_eq!(order.status, ServiceOrderStatus::InProgress);

        let instance = repos
            .checklists()
            .find_by_service_order(&order.id)
            .await
            .unwrap()
            .unwrap();
        let answers = repos.checklists().answers(&instance.id).await.unwrap();
        assert_eq!(answers.len(), 2);
        assert!(answers.iter().all(|a| a.is_answered()));
    }
}
