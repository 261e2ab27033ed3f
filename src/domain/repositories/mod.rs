//! Repository traits for the domain layer
//!
//! Contains:
//! - `RepositoryProvider`: unified access to all per-aggregate repositories
//! - `DomainResult`: standard result type for domain operations

use async_trait::async_trait;

use super::checklist::ChecklistRepository;
use super::photo::PhotoRepository;
use super::service_order::ServiceOrderRepository;
use super::user::UserRepository;
use crate::shared::errors::DomainError;

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

// ── RepositoryProvider ──────────────────────────────────────────

/// Provides access to all domain repositories.
///
/// Consumers request only the repository they need:
///
/// ```ignore
/// async fn handle(repos: &dyn RepositoryProvider) {
///     let so = repos.service_orders().find_by_id("so-1").await?;
///     let inst = repos.checklists().find_by_service_order("so-1").await?;
/// }
/// ```
#[async_trait]
pub trait RepositoryProvider: Send + Sync {
    fn users(&self) -> &dyn UserRepository;
    fn service_orders(&self) -> &dyn ServiceOrderRepository;
    fn checklists(&self) -> &dyn ChecklistRepository;
    fn photos(&self) -> &dyn PhotoRepository;

    /// Round-trip to the backing store, for health checks.
    async fn ping(&self) -> DomainResult<()>;
}
