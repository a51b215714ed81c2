use sea_orm::entity::prelude::*;

use super::sea_orm_active_enums::RequestStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "land_requests")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub farmer_id: Uuid,
    pub land_id: Uuid,
    #[sea_orm(column_type = "Text")]
    pub message: String,
    pub status: RequestStatus,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::FarmerId",
        to = "super::users::Column::Id",
        on_delete = "Cascade"
    )]
    Users,
    #[sea_orm(
        belongs_to = "super::lands::Entity",
        from = "Column::LandId",
        to = "super::lands::Column::Id",
        on_delete = "Cascade"
    )]
    Lands,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl Related<super::lands::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Lands.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
