pub mod service;

pub use service::{CreateServiceOrder, ServiceOrderQuery, ServiceOrderService};
