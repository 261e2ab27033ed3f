//! Blob store adapters
//!
//! - [`S3BlobStore`]: S3-compatible object storage (MinIO, AWS) through opendal
//! - [`InMemoryBlobStore`]: process-local store for development and tests,
//!   issuing HMAC-style signed URLs that are never actually served

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use opendal::{services::S3, Operator};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::application::ports::BlobStore;
use crate::domain::{DomainError, DomainResult};

/// Connection settings for an S3-compatible store
#[derive(Debug, Clone)]
pub struct S3Settings {
    pub endpoint: String,
    pub region: String,
    pub bucket: String,
    pub access_key_id: String,
    pub secret_access_key: String,
    pub root: String,
}

pub struct S3BlobStore {
    operator: Operator,
}

impl S3BlobStore {
    pub fn new(settings: &S3Settings) -> DomainResult<Self> {
        let mut builder = S3::default();
        builder
            .endpoint(&settings.endpoint)
            .root(&settings.root)
            .bucket(&settings.bucket)
            .region(&settings.region)
            .access_key_id(&settings.access_key_id)
            .secret_access_key(&settings.secret_access_key);
        let operator = Operator::new(builder)?.finish();
        Ok(Self { operator })
    }
}

#[async_trait]
impl BlobStore for S3BlobStore {
    async fn put(&self, key: &str, content_type: &str, bytes: Vec<u8>) -> DomainResult<()> {
        let len = bytes.len();
        self.operator
            .write_with(key, bytes)
            .content_type(content_type)
            .await?;
        debug!(key, len, "Object stored");
        Ok(())
    }

    async fn signed_url(&self, key: &str, ttl: Duration) -> DomainResult<String> {
        let req = self.operator.presign_read(key, ttl).await?;
        Ok(req.uri().to_string())
    }
}

/// Stored object: content type and bytes
type StoredObject = (String, Vec<u8>);

pub struct InMemoryBlobStore {
    base_url: String,
    signing_key: String,
    objects: DashMap<String, StoredObject>,
}

impl InMemoryBlobStore {
    pub fn new(base_url: impl Into<String>, signing_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            signing_key: signing_key.into(),
            objects: DashMap::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.objects.get(key).map(|o| o.1.clone())
    }

    pub fn content_type(&self, key: &str) -> Option<String> {
        self.objects.get(key).map(|o| o.0.clone())
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    fn signature(&self, key: &str, expires: i64) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.signing_key.as_bytes());
        hasher.update(b"\n");
        hasher.update(key.as_bytes());
        hasher.update(b"\n");
        hasher.update(expires.to_string().as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Check a signature issued by [`BlobStore::signed_url`].
    pub fn verify(&self, key: &str, expires: i64, signature: &str) -> bool {
        expires >= Utc::now().timestamp() && self.signature(key, expires) == signature
    }
}

#[async_trait]
impl BlobStore for InMemoryBlobStore {
    async fn put(&self, key: &str, content_type: &str, bytes: Vec<u8>) -> DomainResult<()> {
        if key.is_empty() {
            return Err(DomainError::Storage("Empty object key".into()));
        }
        self.objects
            .insert(key.to_string(), (content_type.to_string(), bytes));
        Ok(())
    }

    async fn signed_url(&self, key: &str, ttl: Duration) -> DomainResult<String> {
        if !self.objects.contains_key(key) {
            return Err(DomainError::not_found("Object", key));
        }
        let expires = Utc::now().timestamp() + ttl.as_secs() as i64;
        Ok(format!(
            "{}/{}?expires={}&signature={}",
            self.base_url,
            key,
            expires,
            self.signature(key, expires)
        ))
    }
}
