//! Photo API handlers

use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartError, Multipart, Path, State},
    http::StatusCode,
    Extension, Json,
};

use super::dto::{PhotoDto, PhotoUploadForm};
use crate::application::{PhotoService, PhotoUpload};
use crate::domain::DomainError;
use crate::interfaces::http::common::ErrorBody;
use crate::interfaces::http::error::ApiResult;
use crate::interfaces::http::middleware::AuthenticatedUser;

/// Multipart field carrying the image
pub const FILE_FIELD: &str = "file";

#[derive(Clone)]
pub struct PhotoHandlerState {
    pub photos: Arc<PhotoService>,
}

#[utoipa::path(
    get,
    path = "/service-orders/{id}/photos",
    tag = "Photos",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Service order ID")),
    responses(
        (status = 200, description = "Photos, newest first", body = Vec<PhotoDto>),
        (status = 404, description = "Service order not found", body = ErrorBody)
    )
)]
pub async fn list_photos(
    State(state): State<PhotoHandlerState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<PhotoDto>>> {
    let photos = state.photos.list(&id).await?;
    Ok(Json(photos.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    post,
    path = "/service-orders/{id}/photos",
    tag = "Photos",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Service order ID")),
    request_body(content = PhotoUploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Photo stored", body = PhotoDto),
        (status = 400, description = "Missing, oversized or wrong-type file, or quota reached", body = ErrorBody),
        (status = 403, description = "Not the owner", body = ErrorBody),
        (status = 404, description = "Service order not found", body = ErrorBody)
    )
)]
pub async fn upload_photo(
    State(state): State<PhotoHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    mut multipart: Multipart,
) -> ApiResult<(StatusCode, Json<PhotoDto>)> {
    let max_bytes = state.photos.limits().max_bytes();
    let file = read_file_field(&mut multipart, max_bytes).await?;
    let photo = state.photos.upload(&id, file, &user.actor()).await?;
    Ok((StatusCode::CREATED, Json(photo.into())))
}

/// Reads the `file` field. Stops buffering one chunk past `max_bytes` so an
/// oversized upload is rejected without holding all of it.
async fn read_file_field(
    multipart: &mut Multipart,
    max_bytes: u64,
) -> ApiResult<Option<PhotoUpload>> {
    while let Some(mut field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let content_type = field.content_type().unwrap_or_default().to_string();
        let mut bytes = Vec::new();
        while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
            bytes.extend_from_slice(&chunk);
            if bytes.len() as u64 > max_bytes {
                break;
            }
        }
        return Ok(Some(PhotoUpload {
            content_type,
            bytes,
        }));
    }
    Ok(None)
}

fn multipart_error(e: MultipartError) -> DomainError {
    DomainError::Validation(format!("Invalid multipart body: {}", e.body_text()))
}
