//! Credential handling: bcrypt password hashes and HS256 access tokens.

pub mod jwt;
pub mod password;

pub use jwt::{AccessClaims, JwtConfig};
pub use password::{hash_password, verify_password};
