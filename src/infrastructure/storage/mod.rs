//! Storage adapters: the in-memory repository provider and blob stores

mod blob;
mod memory;

pub use blob::{InMemoryBlobStore, S3BlobStore, S3Settings};
pub use memory::InMemoryRepositoryProvider;
