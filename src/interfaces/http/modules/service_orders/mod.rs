//! Service orders module: CRUD with optional checklist bootstrap

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
