//! User aggregate
//!
//! Contains the User entity, roles, and repository interface.

pub mod model;
pub mod repository;

pub use model::{NewUser, User, UserRole};
pub use repository::UserRepository;
