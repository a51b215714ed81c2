use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    Set,
};
use uuid::Uuid;

use agrilink::{
    config::AppConfig,
    db::{create_orm_conn, prepare_schema},
    entity::{
        Lands, Products, Users, lands, products, profiles,
        sea_orm_active_enums::{Role, SoilType, SuitableFor},
        users,
    },
    services::auth_service::hash_password,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let orm = create_orm_conn(&config.database_url).await?;
    prepare_schema(&orm).await?;

    let landowner = ensure_user(&orm, "Meera Patil", "landowner@example.com", "9000000001", Role::Landowner).await?;
    let farmer = ensure_user(&orm, "Ravi Kumar", "farmer@example.com", "9000000002", Role::Farmer).await?;
    let customer = ensure_user(&orm, "Anita Rao", "customer@example.com", "9000000003", Role::Customer).await?;
    seed_lands(&orm, landowner).await?;
    seed_products(&orm, farmer).await?;

    println!("Seed completed. Landowner: {landowner}, Farmer: {farmer}, Customer: {customer}");
    Ok(())
}

async fn ensure_user(
    orm: &DatabaseConnection,
    name: &str,
    email: &str,
    phone: &str,
    role: Role,
) -> anyhow::Result<Uuid> {
    if let Some(existing) = Users::find()
        .filter(users::Column::Email.eq(email))
        .one(orm)
        .await?
    {
        println!("User {email} already present");
        return Ok(existing.id);
    }

    let password_hash =
        hash_password("password123").map_err(|e| anyhow::anyhow!(e.to_string()))?;
    let user = users::ActiveModel {
        id: Set(Uuid::new_v4()),
        email: Set(email.to_string()),
        name: Set(name.to_string()),
        password_hash: Set(password_hash),
        created_at: Set(Utc::now().into()),
    }
    .insert(orm)
    .await?;
    profiles::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user.id),
        phone: Set(phone.to_string()),
        role: Set(role),
    }
    .insert(orm)
    .await?;

    println!("Ensured user {email} (role={role:?})");
    Ok(user.id)
}

async fn seed_lands(orm: &DatabaseConnection, owner_id: Uuid) -> anyhow::Result<()> {
    let existing = Lands::find()
        .filter(lands::Column::OwnerId.eq(owner_id))
        .count(orm)
        .await?;
    if existing > 0 {
        return Ok(());
    }

    let listings = vec![
        ("Green Acres", SoilType::Alluvial, SuitableFor::Both, "Nashik", "Five acres near the canal"),
        ("Red Ridge", SoilType::Red, SuitableFor::Fruits, "Ratnagiri", "Hill plot suited to mango"),
    ];
    for (farm_name, soil_type, suitable_for, location, description) in listings {
        lands::ActiveModel {
            id: Set(Uuid::new_v4()),
            owner_id: Set(owner_id),
            farm_name: Set(farm_name.to_string()),
            soil_type: Set(soil_type),
            suitable_for: Set(suitable_for),
            location: Set(location.to_string()),
            phone: Set("9000000001".to_string()),
            description: Set(description.to_string()),
            created_at: Set(Utc::now().into()),
        }
        .insert(orm)
        .await?;
    }

    println!("Seeded lands");
    Ok(())
}

async fn seed_products(orm: &DatabaseConnection, farmer_id: Uuid) -> anyhow::Result<()> {
    let existing = Products::find()
        .filter(products::Column::FarmerId.eq(farmer_id))
        .count(orm)
        .await?;
    if existing > 0 {
        return Ok(());
    }

    let items = vec![
        ("Tomatoes", "Vine ripened, per kg", 4_250, 120),
        ("Basmati Rice", "Aged one year, per kg", 11_000, 400),
        ("Alphonso Mangoes", "Per dozen", 60_000, 30),
    ];
    for (name, description, price, quantity) in items {
        products::ActiveModel {
            id: Set(Uuid::new_v4()),
            farmer_id: Set(farmer_id),
            name: Set(name.to_string()),
            price: Set(price),
            quantity: Set(quantity),
            description: Set(description.to_string()),
            created_at: Set(Utc::now().into()),
        }
        .insert(orm)
        .await?;
    }

    println!("Seeded products");
    Ok(())
}
