use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "land_images")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub land_id: Uuid,
    /// Path relative to the media root.
    pub image: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::lands::Entity",
        from = "Column::LandId",
        to = "super::lands::Column::Id",
        on_delete = "Cascade"
    )]
    Lands,
}

impl Related<super::lands::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Lands.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
