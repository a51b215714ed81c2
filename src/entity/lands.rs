use sea_orm::entity::prelude::*;

use super::sea_orm_active_enums::{SoilType, SuitableFor};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "lands")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub owner_id: Uuid,
    pub farm_name: String,
    pub soil_type: SoilType,
    pub suitable_for: SuitableFor,
    pub location: String,
    pub phone: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::OwnerId",
        to = "super::users::Column::Id",
        on_delete = "Cascade"
    )]
    Users,
    #[sea_orm(has_many = "super::land_images::Entity")]
    LandImages,
    #[sea_orm(has_many = "super::land_requests::Entity")]
    LandRequests,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl Related<super::land_images::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LandImages.def()
    }
}

impl Related<super::land_requests::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LandRequests.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
