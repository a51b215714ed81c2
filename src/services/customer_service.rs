use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use crate::{
    audit,
    dto::customer::{CustomerDashboard, ProductRequestForm},
    entity::{
        product_requests::{self, Entity as ProductRequests},
        products::Entity as Products,
        sea_orm_active_enums::{RequestStatus, Role},
    },
    error::{AppError, AppResult},
    forms::parse_id,
    middleware::auth::AuthUser,
    models::ProductRequest,
    services::{auth_service::require_role, catalog},
    state::AppState,
    workflow::{RequestAction, RequestCounts},
};

pub async fn dashboard(state: &AppState, user: &AuthUser) -> AppResult<CustomerDashboard> {
    let profile = require_role(state, user, Role::Customer).await?;

    let products = catalog::products_with_images(&state.orm, None).await?;
    let requests = ProductRequests::find()
        .filter(product_requests::Column::CustomerId.eq(user.user_id))
        .order_by_desc(product_requests::Column::CreatedAt)
        .all(&state.orm)
        .await?;
    let counts = RequestCounts::tally(requests.iter().map(|r| r.status));

    Ok(CustomerDashboard {
        profile: profile.into(),
        products,
        requests: requests.into_iter().map(Into::into).collect(),
        counts,
    })
}

pub async fn send_product_request(
    state: &AppState,
    user: &AuthUser,
    form: ProductRequestForm,
) -> AppResult<ProductRequest> {
    require_role(state, user, Role::Customer).await?;
    let product_id = parse_id(&form.product_id)?;
    let product = Products::find_by_id(product_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    let quantity = form.clean_quantity()?;

    let request = product_requests::ActiveModel {
        id: Set(Uuid::new_v4()),
        customer_id: Set(user.user_id),
        product_id: Set(product.id),
        quantity: Set(quantity),
        message: Set(form.message.trim().to_string()),
        status: Set(RequestStatus::Pending),
        created_at: Set(Utc::now().into()),
    }
    .insert(&state.orm)
    .await?;

    tracing::info!(user_id = %user.user_id, product_id = %product.id, request_id = %request.id, "product request sent");
    audit::record(
        &state.orm,
        user.user_id,
        "product_request_create",
        "product_requests",
        serde_json::json!({ "request_id": request.id, "product_id": product.id, "quantity": quantity }),
    )
    .await;

    Ok(request.into())
}

/// Cancels one of the caller's requests while it is still pending.
pub async fn cancel_product_request(
    state: &AppState,
    user: &AuthUser,
    request_id: &str,
) -> AppResult<RequestStatus> {
    require_role(state, user, Role::Customer).await?;
    let id = parse_id(request_id)?;
    let request = ProductRequests::find_by_id(id)
        .filter(product_requests::Column::CustomerId.eq(user.user_id))
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let Some(next) = request.status.apply(RequestAction::Cancel) else {
        tracing::debug!(request_id = %id, status = ?request.status, "cancel ignored");
        return Ok(request.status);
    };

    let mut active = product_requests::ActiveModel::from(request);
    active.status = Set(next);
    active.update(&state.orm).await?;

    tracing::info!(user_id = %user.user_id, request_id = %id, "product request cancelled");
    audit::record(
        &state.orm,
        user.user_id,
        "product_request_cancel",
        "product_requests",
        serde_json::json!({ "request_id": id }),
    )
    .await;

    Ok(next)
}
