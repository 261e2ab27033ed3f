//! # Fieldops service
//!
//! Field-service work orders with checklists and photo evidence, served over
//! a JSON REST API.
//!
//! ## Architecture
//!
//! The project follows Clean Architecture principles:
//!
//! - **domain**: entities, the ownership policy and repository traits
//! - **application**: use cases (identity, service orders, checklists, photos)
//! - **infrastructure**: SeaORM and in-memory stores, blob stores, crypto, seed
//! - **interfaces**: axum HTTP API with Swagger documentation
//! - **server**: runtime wiring and graceful shutdown

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

pub use config::{default_config_path, AppConfig};

// Re-export database types for easy access
pub use infrastructure::{init_database, DatabaseConfig, SeaOrmRepositoryProvider};

// Re-export API router
pub use interfaces::http::create_api_router;
