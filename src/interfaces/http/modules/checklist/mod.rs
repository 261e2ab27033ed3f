//! Checklist module: templates and the per-order checklist lifecycle

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
