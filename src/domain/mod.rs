pub mod access;
pub mod checklist;
pub mod photo;
pub mod repositories;
pub mod service_order;
pub mod user;

// Re-export commonly used types
pub use access::{ensure_owner_or_admin, is_owner_or_admin, Actor};
pub use checklist::{
    AnswerInput, ChecklistAnswer, ChecklistBootstrap, ChecklistDetail, ChecklistInstance,
    ChecklistItem, ChecklistTemplate, NewChecklistItem, NewChecklistTemplate, TemplateWithItems,
};
pub use photo::{NewPhoto, Photo, PhotoMimeType, PhotoWithUrl};
pub use repositories::{DomainResult, RepositoryProvider};
pub use service_order::{
    ServiceOrder, ServiceOrderChanges, ServiceOrderFilter, ServiceOrderStatus,
    ServiceOrderWithChecklist,
};
pub use user::{NewUser, User, UserRole};

pub use crate::shared::errors::DomainError;
