//! Photo DTOs

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::PhotoWithUrl;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PhotoDto {
    pub id: String,
    pub service_order_id: String,
    pub key: String,
    pub mime_type: String,
    pub size: i64,
    pub taken_at: DateTime<Utc>,
    /// Time-limited read URL
    pub presigned_url: String,
}

impl From<PhotoWithUrl> for PhotoDto {
    fn from(p: PhotoWithUrl) -> Self {
        Self {
            id: p.photo.id,
            service_order_id: p.photo.service_order_id,
            key: p.photo.key,
            mime_type: p.photo.mime_type,
            size: p.photo.size,
            taken_at: p.photo.taken_at,
            presigned_url: p.presigned_url,
        }
    }
}

/// Multipart form of `POST /service-orders/{id}/photos`
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct PhotoUploadForm {
    /// JPEG or PNG image
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}
