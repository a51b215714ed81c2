use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity::{
    farmer_details, land_images, land_requests, lands, product_images, product_requests, products,
    profiles,
    sea_orm_active_enums::{RequestStatus, Role, SoilType, SuitableFor},
    users,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Profile {
    pub user_id: Uuid,
    pub phone: String,
    pub role: Role,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FarmerDetails {
    pub id: Uuid,
    pub user_id: Uuid,
    pub farmer_name: String,
    pub phone: String,
    pub email: String,
    pub experience_years: i32,
    pub field_experience: String,
    pub description: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Image {
    pub id: Uuid,
    /// Relative to the media root, served under `/media/`.
    pub image: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Land {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub farm_name: String,
    pub soil_type: SoilType,
    pub suitable_for: SuitableFor,
    pub location: String,
    pub phone: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub images: Vec<Image>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LandRequest {
    pub id: Uuid,
    pub farmer_id: Uuid,
    pub land_id: Uuid,
    pub message: String,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub id: Uuid,
    pub farmer_id: Uuid,
    pub name: String,
    /// Minor currency units (cents).
    pub price: i64,
    pub quantity: i32,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub images: Vec<Image>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProductRequest {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub message: String,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
}

impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            email: model.email,
            name: model.name,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

impl From<profiles::Model> for Profile {
    fn from(model: profiles::Model) -> Self {
        Self {
            user_id: model.user_id,
            phone: model.phone,
            role: model.role,
        }
    }
}

impl From<farmer_details::Model> for FarmerDetails {
    fn from(model: farmer_details::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            farmer_name: model.farmer_name,
            phone: model.phone,
            email: model.email,
            experience_years: model.experience_years,
            field_experience: model.field_experience,
            description: model.description,
        }
    }
}

impl From<land_images::Model> for Image {
    fn from(model: land_images::Model) -> Self {
        Self {
            id: model.id,
            image: model.image,
        }
    }
}

impl From<product_images::Model> for Image {
    fn from(model: product_images::Model) -> Self {
        Self {
            id: model.id,
            image: model.image,
        }
    }
}

impl From<land_requests::Model> for LandRequest {
    fn from(model: land_requests::Model) -> Self {
        Self {
            id: model.id,
            farmer_id: model.farmer_id,
            land_id: model.land_id,
            message: model.message,
            status: model.status,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

impl From<product_requests::Model> for ProductRequest {
    fn from(model: product_requests::Model) -> Self {
        Self {
            id: model.id,
            customer_id: model.customer_id,
            product_id: model.product_id,
            quantity: model.quantity,
            message: model.message,
            status: model.status,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

pub fn land_from_entity(model: lands::Model, images: Vec<land_images::Model>) -> Land {
    Land {
        id: model.id,
        owner_id: model.owner_id,
        farm_name: model.farm_name,
        soil_type: model.soil_type,
        suitable_for: model.suitable_for,
        location: model.location,
        phone: model.phone,
        description: model.description,
        created_at: model.created_at.with_timezone(&Utc),
        images: images.into_iter().map(Image::from).collect(),
    }
}

pub fn product_from_entity(model: products::Model, images: Vec<product_images::Model>) -> Product {
    Product {
        id: model.id,
        farmer_id: model.farmer_id,
        name: model.name,
        price: model.price,
        quantity: model.quantity,
        description: model.description,
        created_at: model.created_at.with_timezone(&Utc),
        images: images.into_iter().map(Image::from).collect(),
    }
}
