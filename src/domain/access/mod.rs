//! Authorization policy shared by every service-order-rooted mutation.

pub mod policy;

pub use policy::{ensure_owner_or_admin, is_owner_or_admin, Actor};
