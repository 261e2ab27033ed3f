//! Service order domain entity

use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::domain::checklist::{ChecklistDetail, ChecklistInstance};
use crate::shared::errors::DomainError;
use crate::shared::types::PaginationParams;

/// Lifecycle status. Transitions are monotonic in [`rank`](Self::rank).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceOrderStatus {
    Open,
    InProgress,
    Done,
}

impl Default for ServiceOrderStatus {
    fn default() -> Self {
        Self::Open
    }
}

impl ServiceOrderStatus {
    pub fn rank(&self) -> u8 {
        match self {
            Self::Open => 0,
            Self::InProgress => 1,
            Self::Done => 2,
        }
    }

    /// Same-status moves are allowed; regressions are not.
    pub fn can_transition_to(&self, next: ServiceOrderStatus) -> bool {
        next.rank() >= self.rank()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::InProgress => "IN_PROGRESS",
            Self::Done => "DONE",
        }
    }
}

impl std::fmt::Display for ServiceOrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceOrderStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "OPEN" => Ok(Self::Open),
            "IN_PROGRESS" => Ok(Self::InProgress),
            "DONE" => Ok(Self::Done),
            other => Err(DomainError::Validation(format!("Unknown status: {}", other))),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ServiceOrder {
    pub id: String,
    pub title: String,
    pub description: String,
    pub status: ServiceOrderStatus,
    pub created_by_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Row data for a new order. Status is always OPEN on insert.
#[derive(Clone, Debug)]
pub struct NewServiceOrder {
    pub title: String,
    pub description: String,
    pub created_by_id: String,
}

/// Partial update; `None` leaves the field untouched.
#[derive(Clone, Debug, Default)]
pub struct ServiceOrderChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<ServiceOrderStatus>,
}

impl ServiceOrderChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.status.is_none()
    }
}

#[derive(Clone, Debug, Default)]
pub struct ServiceOrderFilter {
    pub status: Option<ServiceOrderStatus>,
    /// Case-insensitive substring over title or description
    pub q: Option<String>,
    pub pagination: PaginationParams,
}

/// Result of a create, with the checklist started alongside when requested
#[derive(Clone, Debug)]
pub struct CreatedServiceOrder {
    pub order: ServiceOrder,
    pub checklist: Option<ChecklistInstance>,
}

/// An order together with its checklist projection
#[derive(Clone, Debug)]
pub struct ServiceOrderWithChecklist {
    pub order: ServiceOrder,
    pub checklist: Option<ChecklistDetail>,
}
