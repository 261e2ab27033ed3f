//! Checklist aggregate

pub mod model;
pub mod repository;

pub use model::{
    foreign_items, missing_required_items, AnswerInput, ChecklistAnswer, ChecklistBootstrap,
    ChecklistDetail, ChecklistInstance, ChecklistItem, ChecklistTemplate,
    NewChecklistItem, NewChecklistTemplate, TemplateWithItems,
};
pub use repository::ChecklistRepository;
