//! Photos module: upload and list photo evidence of a service order

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
