//! Checklist answer entity, unique per (instance, item)

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "checklist_answers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub so_checklist_id: String,
    pub item_id: String,
    #[sea_orm(nullable)]
    pub bool_value: Option<bool>,
    #[sea_orm(nullable)]
    pub text_value: Option<String>,
    #[sea_orm(nullable)]
    pub note: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::service_order_checklist::Entity",
        from = "Column::SoChecklistId",
        to = "super::service_order_checklist::Column::Id"
    )]
    Checklist,
    #[sea_orm(
        belongs_to = "super::checklist_item::Entity",
        from = "Column::ItemId",
        to = "super::checklist_item::Column::Id"
    )]
    Item,
}

impl Related<super::service_order_checklist::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Checklist.def()
    }
}

impl Related<super::checklist_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Item.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
