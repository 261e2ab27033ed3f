//! Database entities module

pub mod checklist_answer;
pub mod checklist_item;
pub mod checklist_template;
pub mod service_order;
pub mod service_order_checklist;
pub mod service_order_photo;
pub mod user;

pub use checklist_answer::Entity as ChecklistAnswer;
pub use checklist_item::Entity as ChecklistItem;
pub use checklist_template::Entity as ChecklistTemplate;
pub use service_order::Entity as ServiceOrder;
pub use service_order_checklist::Entity as ServiceOrderChecklist;
pub use service_order_photo::Entity as ServiceOrderPhoto;
pub use user::Entity as User;
