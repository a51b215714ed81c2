use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::profiles::Entity")]
    Profiles,
    #[sea_orm(has_one = "super::farmer_details::Entity")]
    FarmerDetails,
    #[sea_orm(has_many = "super::lands::Entity")]
    Lands,
    #[sea_orm(has_many = "super::products::Entity")]
    Products,
    #[sea_orm(has_many = "super::land_requests::Entity")]
    LandRequests,
    #[sea_orm(has_many = "super::product_requests::Entity")]
    ProductRequests,
}

impl Related<super::profiles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Profiles.def()
    }
}

impl Related<super::farmer_details::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FarmerDetails.def()
    }
}

impl Related<super::lands::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Lands.def()
    }
}

impl Related<super::products::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Products.def()
    }
}

impl Related<super::land_requests::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LandRequests.def()
    }
}

impl Related<super::product_requests::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProductRequests.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
