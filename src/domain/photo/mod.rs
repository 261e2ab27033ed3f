pub mod model;
pub mod repository;

pub use model::{NewPhoto, Photo, PhotoMimeType, PhotoWithUrl};
pub use repository::PhotoRepository;
