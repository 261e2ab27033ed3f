pub mod outbound;

pub use outbound::{BlobStore, SharedBlobStore};
