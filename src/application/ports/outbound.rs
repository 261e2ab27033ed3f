//! Outbound ports: interfaces the application layer calls out through
//!
//! [`BlobStore`] decouples photo handling from the object store. The
//! production implementation talks S3 through opendal
//! ([`S3BlobStore`](crate::infrastructure::storage::S3BlobStore)); tests and the
//! `memory` storage backend use
//! [`InMemoryBlobStore`](crate::infrastructure::storage::InMemoryBlobStore).

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::DomainResult;

#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store `bytes` under `key`, replacing any existing object.
    async fn put(&self, key: &str, content_type: &str, bytes: Vec<u8>) -> DomainResult<()>;

    /// Time-limited retrieval URL for `key`.
    async fn signed_url(&self, key: &str, ttl: Duration) -> DomainResult<String>;
}

pub type SharedBlobStore = Arc<dyn BlobStore>;
