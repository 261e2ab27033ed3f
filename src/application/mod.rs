pub mod checklist;
pub mod identity;
pub mod photos;
pub mod ports;
pub mod service_orders;

#[cfg(test)]
pub(crate) mod testing;

// Re-export key types for convenience
pub use checklist::{ChecklistLocks, ChecklistService};
pub use identity::{AuthResult, RegisterUser, UserService};
pub use photos::{PhotoLimits, PhotoService, PhotoUpload};
pub use ports::{BlobStore, SharedBlobStore};
pub use service_orders::{CreateServiceOrder, ServiceOrderQuery, ServiceOrderService};
