//! Ownership / role authorization rule
//!
//! Every mutation of a service-order-rooted resource (the order itself, its
//! checklist instance and answers, its photos) goes through
//! [`ensure_owner_or_admin`]. There is no other place where this rule lives.

use crate::domain::user::UserRole;
use crate::domain::DomainResult;
use crate::shared::errors::DomainError;

/// The authenticated caller of an operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub id: String,
    pub role: UserRole,
}

impl Actor {
    pub fn new(id: impl Into<String>, role: UserRole) -> Self {
        Self {
            id: id.into(),
            role,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

/// True iff the actor is an ADMIN or owns the resource.
pub fn is_owner_or_admin(actor: &Actor, resource_owner_id: &str) -> bool {
    actor.is_admin() || actor.id == resource_owner_id
}

/// [`is_owner_or_admin`] as a guard: denial becomes `Forbidden`.
pub fn ensure_owner_or_admin(actor: &Actor, resource_owner_id: &str) -> DomainResult<()> {
    if is_owner_or_admin(actor, resource_owner_id) {
        Ok(())
    } else {
        Err(DomainError::Forbidden("Not allowed".into()))
    }
}
