//! HTTP feature modules, one per resource

pub mod auth;
pub mod checklist;
pub mod health;
pub mod metrics;
pub mod photos;
pub mod request_id;
pub mod service_orders;
pub mod users;
