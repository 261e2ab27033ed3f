//! Photo attachment service
//!
//! Guards uploads (size, type, ownership, per-order quota) before handing the
//! bytes to the blob store, and signs retrieval URLs on every read.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use rand::distributions::Alphanumeric;
use rand::Rng;
use tracing::info;

use crate::application::ports::BlobStore;
use crate::domain::{
    ensure_owner_or_admin, Actor, DomainError, DomainResult, NewPhoto, Photo, PhotoMimeType,
    PhotoWithUrl, RepositoryProvider, ServiceOrder,
};

const BYTES_PER_MB: u64 = 1024 * 1024;

#[derive(Debug, Clone, Copy)]
pub struct PhotoLimits {
    pub max_size_mb: u64,
    pub max_per_order: u64,
    pub presign_ttl: Duration,
}

impl Default for PhotoLimits {
    fn default() -> Self {
        Self {
            max_size_mb: 5,
            max_per_order: 10,
            presign_ttl: Duration::from_secs(900),
        }
    }
}

impl PhotoLimits {
    pub fn max_bytes(&self) -> u64 {
        self.max_size_mb * BYTES_PER_MB
    }
}

/// An uploaded file as received from the transport
#[derive(Debug, Clone)]
pub struct PhotoUpload {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

pub struct PhotoService {
    repos: Arc<dyn RepositoryProvider>,
    blobs: Arc<dyn BlobStore>,
    limits: PhotoLimits,
}

impl PhotoService {
    pub fn new(
        repos: Arc<dyn RepositoryProvider>,
        blobs: Arc<dyn BlobStore>,
        limits: PhotoLimits,
    ) -> Self {
        Self {
            repos,
            blobs,
            limits,
        }
    }

    pub fn limits(&self) -> &PhotoLimits {
        &self.limits
    }

    pub async fn upload(
        &self,
        service_order_id: &str,
        file: Option<PhotoUpload>,
        actor: &Actor,
    ) -> DomainResult<PhotoWithUrl> {
        let file = file.ok_or_else(|| DomainError::Validation("File is required".into()))?;
        if file.bytes.len() as u64 > self.limits.max_bytes() {
            return Err(DomainError::Validation(format!(
                "Max file size {}MB",
                self.limits.max_size_mb
            )));
        }
        let mime = PhotoMimeType::from_mime(&file.content_type)
            .ok_or_else(|| DomainError::Validation("Only JPEG/PNG allowed".into()))?;

        let order = self.load_order(service_order_id).await?;
        ensure_owner_or_admin(actor, &order.created_by_id)?;

        let count = self
            .repos
            .photos()
            .count_by_service_order(service_order_id)
            .await?;
        if count >= self.limits.max_per_order {
            return Err(DomainError::InvalidState("Photo limit reached".into()));
        }

        let key = storage_key(service_order_id, mime);
        let size = file.bytes.len() as i64;
        self.blobs.put(&key, mime.as_mime(), file.bytes).await?;

        let photo = self
            .repos
            .photos()
            .create(NewPhoto {
                service_order_id: service_order_id.to_string(),
                key,
                mime_type: mime.as_mime().to_string(),
                size,
            })
            .await?;

        metrics::counter!("fieldops_photos_uploaded_total").increment(1);
        info!(
            service_order_id,
            photo_id = %photo.id,
            key = %photo.key,
            size,
            "Photo uploaded"
        );
        self.with_url(photo).await
    }

    /// Every photo of the order, newest first, each with a fresh URL.
    pub async fn list(&self, service_order_id: &str) -> DomainResult<Vec<PhotoWithUrl>> {
        self.load_order(service_order_id).await?;

        let photos = self
            .repos
            .photos()
            .list_by_service_order(service_order_id)
            .await?;

        let mut out = Vec::with_capacity(photos.len());
        for photo in photos {
            out.push(self.with_url(photo).await?);
        }
        Ok(out)
    }

    async fn with_url(&self, photo: Photo) -> DomainResult<PhotoWithUrl> {
        let presigned_url = self
            .blobs
            .signed_url(&photo.key, self.limits.presign_ttl)
            .await?;
        Ok(PhotoWithUrl {
            photo,
            presigned_url,
        })
    }

    async fn load_order(&self, service_order_id: &str) -> DomainResult<ServiceOrder> {
        self.repos
            .service_orders()
            .find_by_id(service_order_id)
            .await?
            .ok_or_else(|| DomainError::not_found("ServiceOrder", service_order_id))
    }
}

/// `os/{serviceOrderId}/{unixMillis}-{random}.{ext}`
pub fn storage_key(service_order_id: &str, mime: PhotoMimeType) -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(10)
        .map(char::from)
        .collect::<String>()
        .to_lowercase();
    format!(
        "os/{}/{}-{}.{}",
        service_order_id,
        Utc::now().timestamp_millis(),
        suffix,
        mime.extension()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::Fixture;
    use crate::infrastructure::storage::InMemoryBlobStore;

    fn setup(fx: &Fixture, limits: PhotoLimits) -> (PhotoService, Arc<InMemoryBlobStore>) {
        let blobs = Arc::new(InMemoryBlobStore::new("http://blobs.test", "signing-key"));
        (PhotoService::new(fx.provider(), blobs.clone(), limits), blobs)
    }

    fn jpeg(len: usize) -> Option<PhotoUpload> {
        Some(PhotoUpload {
            content_type: "image/jpeg".into(),
            bytes: vec![0xFF; len],
        })
    }

    #[test]
    fn storage_key_is_namespaced_by_order() {
        let key = storage_key("so-1", PhotoMimeType::Png);
        assert!(key.starts_with("os/so-1/"));
        assert!(key.ends_with(".png"));
        let a = storage_key("so-1", PhotoMimeType::Jpeg);
        let b = storage_key("so-1", PhotoMimeType::Jpeg);
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn upload_stores_bytes_and_signs_url() {
        let fx = Fixture::new().await;
        let (svc, blobs) = setup(&fx, PhotoLimits::default());
        let order = fx.order_owned_by(&fx.owner).await;

        let uploaded = svc.upload(&order.id, jpeg(1024), &fx.owner).await.unwrap();
        assert_eq!(uploaded.photo.mime_type, "image/jpeg");
        assert_eq!(uploaded.photo.size, 1024);
        assert!(uploaded.photo.key.starts_with(&format!("os/{}/", order.id)));
        assert!(uploaded.photo.key.ends_with(".jpg"));
        assert!(uploaded.presigned_url.contains(&uploaded.photo.key));
        assert_eq!(blobs.get(&uploaded.photo.key).unwrap().len(), 1024);
        assert_eq!(
            blobs.content_type(&uploaded.photo.key).as_deref(),
            Some("image/jpeg")
        );
    }

    #[tokio::test]
    async fn upload_validates_file() {
        let fx = Fixture::new().await;
        let limits = PhotoLimits {
            max_size_mb: 1,
            ..Default::default()
        };
        let (svc, blobs) = setup(&fx, limits);
        let order = fx.order_owned_by(&fx.owner).await;

        let missing = svc.upload(&order.id, None, &fx.owner).await.unwrap_err();
        assert!(matches!(missing, DomainError::Validation(ref m) if m == "File is required"));

        let big = svc
            .upload(&order.id, jpeg(1024 * 1024 + 1), &fx.owner)
            .await
            .unwrap_err();
        assert!(matches!(big, DomainError::Validation(ref m) if m == "Max file size 1MB"));

        let gif = svc
            .upload(
                &order.id,
                Some(PhotoUpload {
                    content_type: "image/gif".into(),
                    bytes: vec![1, 2, 3],
                }),
                &fx.owner,
            )
            .await
            .unwrap_err();
        assert!(matches!(gif, DomainError::Validation(ref m) if m == "Only JPEG/PNG allowed"));

        assert!(svc.upload(&order.id, jpeg(1024 * 1024), &fx.owner).await.is_ok());
        assert_eq!(blobs.len(), 1);
    }

    #[tokio::test]
    async fn upload_checks_order_and_owner() {
        let fx = Fixture::new().await;
        let (svc, blobs) = setup(&fx, PhotoLimits::default());
        let order = fx.order_owned_by(&fx.owner).await;

        let missing = svc.upload("nope", jpeg(10), &fx.owner).await.unwrap_err();
        assert!(matches!(missing, DomainError::NotFound { .. }));

        let denied = svc.upload(&order.id, jpeg(10), &fx.other).await.unwrap_err();
        assert!(matches!(denied, DomainError::Forbidden(_)));
        assert!(blobs.is_empty());

        assert!(svc.upload(&order.id, jpeg(10), &fx.admin).await.is_ok());
    }

    #[tokio::test]
    async fn quota_rejects_extra_upload() {
        let fx = Fixture::new().await;
        let limits = PhotoLimits {
            max_per_order: 2,
            ..Default::default()
        };
        let (svc, _) = setup(&fx, limits);
        let order = fx.order_owned_by(&fx.owner).await;

        svc.upload(&order.id, jpeg(10), &fx.owner).await.unwrap();
        svc.upload(&order.id, jpeg(10), &fx.owner).await.unwrap();
        let err = svc.upload(&order.id, jpeg(10), &fx.owner).await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidState(ref m) if m == "Photo limit reached"));
    }

    #[tokio::test]
    async fn list_returns_newest_first_with_urls() {
        let fx = Fixture::new().await;
        let (svc, _) = setup(&fx, PhotoLimits::default());
        let order = fx.order_owned_by(&fx.owner).await;

        let first = svc.upload(&order.id, jpeg(10), &fx.owner).await.unwrap();
        let second = svc
            .upload(
                &order.id,
                Some(PhotoUpload {
                    content_type: "image/png".into(),
                    bytes: vec![0x89; 20],
                }),
                &fx.owner,
            )
            .await
            .unwrap();

        let listed = svc.list(&order.id).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].photo.id, second.photo.id);
        assert_eq!(listed[1].photo.id, first.photo.id);
        assert!(listed.iter().all(|p| !p.presigned_url.is_empty()));
    }
}
