use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Account role chosen at signup. Stored as a lowercase tag.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, DeriveActiveEnum,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[sea_orm(string_value = "farmer")]
    Farmer,
    #[sea_orm(string_value = "landowner")]
    Landowner,
    #[sea_orm(string_value = "customer")]
    Customer,
}

/// Lifecycle of a land or product request.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, DeriveActiveEnum,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "approved")]
    Approved,
    #[sea_orm(string_value = "rejected")]
    Rejected,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, DeriveActiveEnum,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(50))")]
#[serde(rename_all = "lowercase")]
pub enum SoilType {
    #[sea_orm(string_value = "black")]
    Black,
    #[sea_orm(string_value = "red")]
    Red,
    #[sea_orm(string_value = "alluvial")]
    Alluvial,
    #[sea_orm(string_value = "sandy")]
    Sandy,
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, DeriveActiveEnum,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(50))")]
#[serde(rename_all = "lowercase")]
pub enum SuitableFor {
    #[sea_orm(string_value = "vegetables")]
    Vegetables,
    #[sea_orm(string_value = "fruits")]
    Fruits,
    #[sea_orm(string_value = "both")]
    Both,
}

/// Parses a submitted choice (e.g. `"landowner"`) into its tag enum.
/// Surrounding whitespace is ignored; matching is case sensitive like the stored values.
pub fn parse_choice<T>(raw: &str) -> Option<T>
where
    T: ActiveEnum<Value = String>,
{
    T::try_from_value(&raw.trim().to_string()).ok()
}

/// All stored tags of a choice enum, in declaration order.
pub fn choices<T>() -> Vec<String>
where
    T: ActiveEnum<Value = String>,
{
    T::iter().map(|variant| variant.to_value()).collect()
}
