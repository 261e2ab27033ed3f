//! Photo evidence metadata

use chrono::{DateTime, Utc};

/// Accepted image types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhotoMimeType {
    Jpeg,
    Png,
}

impl PhotoMimeType {
    /// Parse a declared content type. Anything but JPEG/PNG is `None`.
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime.trim().to_ascii_lowercase().as_str() {
            "image/jpeg" | "image/jpg" => Some(Self::Jpeg),
            "image/png" => Some(Self::Png),
            _ => None,
        }
    }

    pub fn as_mime(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
        }
    }
}

#[derive(Clone, Debug)]
pub struct Photo {
    pub id: String,
    pub service_order_id: String,
    pub key: String,
    pub mime_type: String,
    pub size: i64,
    pub taken_at: DateTime<Utc>,
}

#[derive(Clone, Debug)]
pub struct NewPhoto {
    pub service_order_id: String,
    pub key: String,
    pub mime_type: String,
    pub size: i64,
}

/// Photo metadata plus a freshly signed retrieval URL. The URL is never stored.
#[derive(Clone, Debug)]
pub struct PhotoWithUrl {
    pub photo: Photo,
    pub presigned_url: String,
}
