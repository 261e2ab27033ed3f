//! Service order aggregate
//!
//! The root aggregate for authorization: checklists and photos inherit the
//! owner of the order they belong to.

pub mod model;
pub mod repository;

pub use model::{
    CreatedServiceOrder, NewServiceOrder, ServiceOrder, ServiceOrderChanges, ServiceOrderFilter,
    ServiceOrderStatus, ServiceOrderWithChecklist,
};
pub use repository::ServiceOrderRepository;
