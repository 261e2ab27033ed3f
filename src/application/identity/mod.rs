//! Identity module: user registration & authentication
//!
//! Contains the `UserService` which orchestrates login, account creation,
//! the current-user lookup and the default admin bootstrap.

pub mod service;

pub use service::{AuthResult, RegisterUser, UserService};
