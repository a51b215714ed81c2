//! Listing reads and image bookkeeping shared by the role services.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, LoaderTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use crate::{
    entity::{
        land_images::{self, Entity as LandImages},
        land_requests::{self, Entity as LandRequests},
        lands::{self, Entity as Lands},
        product_images::{self, Entity as ProductImages},
        product_requests::{self, Entity as ProductRequests},
        products::{self, Entity as Products},
    },
    error::AppResult,
    forms::UploadedFile,
    models::{Land, Product, land_from_entity, product_from_entity},
    storage::{LAND_PHOTOS, MediaStore, PRODUCT_IMAGES},
};

/// Land listings with their photos, newest first. `owner` narrows to one landowner.
pub async fn lands_with_images<C>(db: &C, owner: Option<Uuid>) -> AppResult<Vec<Land>>
where
    C: ConnectionTrait,
{
    let mut finder = Lands::find();
    if let Some(owner) = owner {
        finder = finder.filter(lands::Column::OwnerId.eq(owner));
    }
    let lands = finder
        .order_by_desc(lands::Column::CreatedAt)
        .all(db)
        .await?;
    let images = lands.load_many(LandImages, db).await?;

    Ok(lands
        .into_iter()
        .zip(images)
        .map(|(land, images)| land_from_entity(land, images))
        .collect())
}

/// Product listings with their images, newest first. `farmer` narrows to one seller.
pub async fn products_with_images<C>(db: &C, farmer: Option<Uuid>) -> AppResult<Vec<Product>>
where
    C: ConnectionTrait,
{
    let mut finder = Products::find();
    if let Some(farmer) = farmer {
        finder = finder.filter(products::Column::FarmerId.eq(farmer));
    }
    let products = finder
        .order_by_desc(products::Column::CreatedAt)
        .all(db)
        .await?;
    let images = products.load_many(ProductImages, db).await?;

    Ok(products
        .into_iter()
        .zip(images)
        .map(|(product, images)| product_from_entity(product, images))
        .collect())
}

/// Stores each upload and records it against the land. References of files
/// already written are pushed to `stored` so the caller can clean up on failure.
pub async fn attach_land_images<C>(
    db: &C,
    media: &MediaStore,
    land_id: Uuid,
    files: &[UploadedFile],
    stored: &mut Vec<String>,
) -> AppResult<Vec<land_images::Model>>
where
    C: ConnectionTrait,
{
    let mut images = Vec::with_capacity(files.len());
    for file in files {
        let reference = media.save(LAND_PHOTOS, land_id, file).await?;
        stored.push(reference.clone());
        let image = land_images::ActiveModel {
            id: Set(Uuid::new_v4()),
            land_id: Set(land_id),
            image: Set(reference),
        }
        .insert(db)
        .await?;
        images.push(image);
    }
    Ok(images)
}

pub async fn attach_product_images<C>(
    db: &C,
    media: &MediaStore,
    product_id: Uuid,
    files: &[UploadedFile],
    stored: &mut Vec<String>,
) -> AppResult<Vec<product_images::Model>>
where
    C: ConnectionTrait,
{
    let mut images = Vec::with_capacity(files.len());
    for file in files {
        let reference = media.save(PRODUCT_IMAGES, product_id, file).await?;
        stored.push(reference.clone());
        let image = product_images::ActiveModel {
            id: Set(Uuid::new_v4()),
            product_id: Set(product_id),
            image: Set(reference),
        }
        .insert(db)
        .await?;
        images.push(image);
    }
    Ok(images)
}

/// Deletes a land with its images and the requests made against it.
/// Run inside a transaction; returns the image references to remove from storage.
pub async fn delete_land_cascade<C>(db: &C, land_id: Uuid) -> AppResult<Vec<String>>
where
    C: ConnectionTrait,
{
    let references = LandImages::find()
        .filter(land_images::Column::LandId.eq(land_id))
        .all(db)
        .await?
        .into_iter()
        .map(|image| image.image)
        .collect();

    LandImages::delete_many()
        .filter(land_images::Column::LandId.eq(land_id))
        .exec(db)
        .await?;
    LandRequests::delete_many()
        .filter(land_requests::Column::LandId.eq(land_id))
        .exec(db)
        .await?;
    Lands::delete_by_id(land_id).exec(db).await?;

    Ok(references)
}

pub async fn delete_product_cascade<C>(db: &C, product_id: Uuid) -> AppResult<Vec<String>>
where
    C: ConnectionTrait,
{
    let references = ProductImages::find()
        .filter(product_images::Column::ProductId.eq(product_id))
        .all(db)
        .await?
        .into_iter()
        .map(|image| image.image)
        .collect();

    ProductImages::delete_many()
        .filter(product_images::Column::ProductId.eq(product_id))
        .exec(db)
        .await?;
    ProductRequests::delete_many()
        .filter(product_requests::Column::ProductId.eq(product_id))
        .exec(db)
        .await?;
    Products::delete_by_id(product_id).exec(db).await?;

    Ok(references)
}
