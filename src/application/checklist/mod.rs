//! Checklist lifecycle: templates, start, answers, finish.

pub mod locks;
pub mod service;

pub use locks::ChecklistLocks;
pub use service::{validate_new_template, ChecklistService};
