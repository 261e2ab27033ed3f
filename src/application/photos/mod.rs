pub mod service;

pub use service::{PhotoLimits, PhotoService, PhotoUpload};
