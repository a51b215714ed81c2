use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, ModelTrait, QueryFilter, QueryOrder,
    QuerySelect, RelationTrait, Set, TransactionTrait, sea_query::JoinType,
};
use uuid::Uuid;

use crate::{
    audit,
    dto::farmer::{FarmerDashboard, FarmerDetailsForm, LandRequestForm, ProductForm},
    entity::{
        farmer_details::{self, Entity as FarmerDetails},
        land_requests::{self, Entity as LandRequests},
        lands::Entity as Lands,
        product_images::Entity as ProductImages,
        product_requests::{self, Entity as ProductRequests},
        products::{self, Entity as Products},
        sea_orm_active_enums::{RequestStatus, Role},
    },
    error::{AppError, AppResult},
    forms::{UploadedFile, parse_id, with_images},
    middleware::auth::AuthUser,
    models::{self, LandRequest, Product, product_from_entity},
    services::{auth_service::require_role, catalog},
    state::AppState,
    workflow::{RequestAction, RequestCounts},
};

pub async fn dashboard(state: &AppState, user: &AuthUser) -> AppResult<FarmerDashboard> {
    let profile = require_role(state, user, Role::Farmer).await?;

    let details = FarmerDetails::find()
        .filter(farmer_details::Column::UserId.eq(user.user_id))
        .one(&state.orm)
        .await?;
    let lands = catalog::lands_with_images(&state.orm, None).await?;
    let requests = LandRequests::find()
        .filter(land_requests::Column::FarmerId.eq(user.user_id))
        .order_by_desc(land_requests::Column::CreatedAt)
        .all(&state.orm)
        .await?;
    let products = catalog::products_with_images(&state.orm, Some(user.user_id)).await?;
    let product_requests = ProductRequests::find()
        .join(JoinType::InnerJoin, product_requests::Relation::Products.def())
        .filter(products::Column::FarmerId.eq(user.user_id))
        .order_by_desc(product_requests::Column::CreatedAt)
        .all(&state.orm)
        .await?;

    let counts = RequestCounts::tally(requests.iter().map(|r| r.status));

    Ok(FarmerDashboard {
        profile: profile.into(),
        details: details.map(Into::into),
        lands,
        requests: requests.into_iter().map(Into::into).collect(),
        counts,
        products,
        product_requests: product_requests.into_iter().map(Into::into).collect(),
    })
}

/// Creates the caller's details on first save and overwrites them afterwards.
pub async fn save_details(
    state: &AppState,
    user: &AuthUser,
    form: FarmerDetailsForm,
) -> AppResult<models::FarmerDetails> {
    require_role(state, user, Role::Farmer).await?;
    let input = form.clean()?;

    let existing = FarmerDetails::find()
        .filter(farmer_details::Column::UserId.eq(user.user_id))
        .one(&state.orm)
        .await?;

    let created = existing.is_none();
    let mut active = match existing {
        Some(details) => farmer_details::ActiveModel::from(details),
        None => farmer_details::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user.user_id),
            ..Default::default()
        },
    };
    active.farmer_name = Set(input.farmer_name);
    active.phone = Set(input.phone);
    active.email = Set(input.email);
    active.experience_years = Set(input.experience_years);
    active.field_experience = Set(input.field_experience);
    active.description = Set(input.description);

    let details = if created {
        active.insert(&state.orm).await?
    } else {
        active.update(&state.orm).await?
    };

    tracing::info!(user_id = %user.user_id, created, "farmer details saved");
    audit::record(
        &state.orm,
        user.user_id,
        "farmer_details_save",
        "farmer_details",
        serde_json::json!({ "details_id": details.id }),
    )
    .await;

    Ok(details.into())
}

pub async fn delete_details(state: &AppState, user: &AuthUser, id: &str) -> AppResult<()> {
    require_role(state, user, Role::Farmer).await?;
    let id = parse_id(id)?;

    let res = FarmerDetails::delete_many()
        .filter(farmer_details::Column::Id.eq(id))
        .filter(farmer_details::Column::UserId.eq(user.user_id))
        .exec(&state.orm)
        .await?;
    if res.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    tracing::info!(user_id = %user.user_id, details_id = %id, "farmer details deleted");
    audit::record(
        &state.orm,
        user.user_id,
        "farmer_details_delete",
        "farmer_details",
        serde_json::json!({ "details_id": id }),
    )
    .await;

    Ok(())
}

/// Creates a product with its images. Stored files are removed again when
/// anything fails before the commit.
pub async fn add_product(
    state: &AppState,
    user: &AuthUser,
    form: ProductForm,
    files: Vec<UploadedFile>,
) -> AppResult<Product> {
    require_role(state, user, Role::Farmer).await?;
    let input = with_images(form.clean(), &files)?;

    let txn = state.orm.begin().await?;
    let mut stored = Vec::new();
    let result = async {
        let product = products::ActiveModel {
            id: Set(Uuid::new_v4()),
            farmer_id: Set(user.user_id),
            name: Set(input.name),
            price: Set(input.price),
            quantity: Set(input.quantity),
            description: Set(input.description),
            created_at: Set(Utc::now().into()),
        }
        .insert(&txn)
        .await?;
        let images =
            catalog::attach_product_images(&txn, &state.media, product.id, &files, &mut stored)
                .await?;
        Ok::<_, AppError>((product, images))
    }
    .await;

    let (product, images) = match result {
        Ok(created) => created,
        Err(err) => {
            drop(txn);
            state.media.remove_all(&stored).await;
            return Err(err);
        }
    };
    if let Err(err) = txn.commit().await {
        state.media.remove_all(&stored).await;
        return Err(err.into());
    }

    tracing::info!(user_id = %user.user_id, product_id = %product.id, images = images.len(), "product created");
    audit::record(
        &state.orm,
        user.user_id,
        "product_create",
        "products",
        serde_json::json!({ "product_id": product.id, "images": images.len() }),
    )
    .await;

    Ok(product_from_entity(product, images))
}

pub async fn update_product(
    state: &AppState,
    user: &AuthUser,
    product_id: &str,
    form: ProductForm,
) -> AppResult<Product> {
    require_role(state, user, Role::Farmer).await?;
    let product = find_own_product(&state.orm, user.user_id, product_id).await?;
    let input = form.clean()?;

    let mut active = products::ActiveModel::from(product);
    active.name = Set(input.name);
    active.price = Set(input.price);
    active.quantity = Set(input.quantity);
    active.description = Set(input.description);
    let product = active.update(&state.orm).await?;

    tracing::info!(user_id = %user.user_id, product_id = %product.id, "product updated");
    audit::record(
        &state.orm,
        user.user_id,
        "product_update",
        "products",
        serde_json::json!({ "product_id": product.id }),
    )
    .await;

    let images = product.find_related(ProductImages).all(&state.orm).await?;
    Ok(product_from_entity(product, images))
}

/// Removes the product together with its images and the requests made for it.
pub async fn delete_product(state: &AppState, user: &AuthUser, product_id: &str) -> AppResult<()> {
    require_role(state, user, Role::Farmer).await?;
    let product = find_own_product(&state.orm, user.user_id, product_id).await?;

    let txn = state.orm.begin().await?;
    let references = catalog::delete_product_cascade(&txn, product.id).await?;
    txn.commit().await?;
    state.media.remove_all(&references).await;

    tracing::info!(user_id = %user.user_id, product_id = %product.id, "product deleted");
    audit::record(
        &state.orm,
        user.user_id,
        "product_delete",
        "products",
        serde_json::json!({ "product_id": product.id, "images": references.len() }),
    )
    .await;

    Ok(())
}

/// Files a pending request for a land listing. Unknown listings write nothing.
pub async fn send_land_request(
    state: &AppState,
    user: &AuthUser,
    form: LandRequestForm,
) -> AppResult<LandRequest> {
    require_role(state, user, Role::Farmer).await?;
    let land_id = parse_id(&form.land_id)?;
    let land = Lands::find_by_id(land_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let request = land_requests::ActiveModel {
        id: Set(Uuid::new_v4()),
        farmer_id: Set(user.user_id),
        land_id: Set(land.id),
        message: Set(form.message.trim().to_string()),
        status: Set(RequestStatus::Pending),
        created_at: Set(Utc::now().into()),
    }
    .insert(&state.orm)
    .await?;

    tracing::info!(user_id = %user.user_id, land_id = %land.id, request_id = %request.id, "land request sent");
    audit::record(
        &state.orm,
        user.user_id,
        "land_request_create",
        "land_requests",
        serde_json::json!({ "request_id": request.id, "land_id": land.id }),
    )
    .await;

    Ok(request.into())
}

/// Cancels one of the caller's land requests. Returns the status it ends in.
pub async fn cancel_land_request(
    state: &AppState,
    user: &AuthUser,
    request_id: &str,
) -> AppResult<RequestStatus> {
    require_role(state, user, Role::Farmer).await?;
    let id = parse_id(request_id)?;
    let request = LandRequests::find_by_id(id)
        .filter(land_requests::Column::FarmerId.eq(user.user_id))
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let Some(next) = request.status.apply(RequestAction::Cancel) else {
        tracing::debug!(request_id = %id, status = ?request.status, "cancel ignored");
        return Ok(request.status);
    };

    let mut active = land_requests::ActiveModel::from(request);
    active.status = Set(next);
    active.update(&state.orm).await?;

    tracing::info!(user_id = %user.user_id, request_id = %id, "land request cancelled");
    audit::record(
        &state.orm,
        user.user_id,
        "land_request_cancel",
        "land_requests",
        serde_json::json!({ "request_id": id }),
    )
    .await;

    Ok(next)
}

/// Approves or rejects a customer request for one of the caller's products.
pub async fn decide_product_request(
    state: &AppState,
    user: &AuthUser,
    request_id: &str,
    action: RequestAction,
) -> AppResult<RequestStatus> {
    require_role(state, user, Role::Farmer).await?;
    let id = parse_id(request_id)?;
    let request = ProductRequests::find_by_id(id)
        .join(JoinType::InnerJoin, product_requests::Relation::Products.def())
        .filter(products::Column::FarmerId.eq(user.user_id))
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let Some(next) = request.status.apply(action) else {
        tracing::debug!(request_id = %id, status = ?request.status, action = action.as_str(), "decision ignored");
        return Ok(request.status);
    };

    let mut active = product_requests::ActiveModel::from(request);
    active.status = Set(next);
    active.update(&state.orm).await?;

    tracing::info!(user_id = %user.user_id, request_id = %id, status = ?next, "product request decided");
    audit::record(
        &state.orm,
        user.user_id,
        "product_request_decide",
        "product_requests",
        serde_json::json!({ "request_id": id, "action": action.as_str() }),
    )
    .await;

    Ok(next)
}

async fn find_own_product<C>(db: &C, farmer_id: Uuid, raw_id: &str) -> AppResult<products::Model>
where
    C: ConnectionTrait,
{
    let id = parse_id(raw_id)?;
    Products::find_by_id(id)
        .filter(products::Column::FarmerId.eq(farmer_id))
        .one(db)
        .await?
        .ok_or(AppError::NotFound)
}
