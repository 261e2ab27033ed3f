//! Infrastructure layer - external concerns

pub mod crypto;
pub mod database;
pub mod seed;
pub mod storage;

pub use database::{init_database, run_migrations, DatabaseConfig, SeaOrmRepositoryProvider};
pub use storage::{InMemoryBlobStore, InMemoryRepositoryProvider, S3BlobStore, S3Settings};
