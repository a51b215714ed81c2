use axum::{
    Json, Router,
    extract::{Path, State},
    response::Redirect,
    routing::{get, post},
};

use crate::{
    dto::farmer::{FarmerAction, FarmerDashboard, ProductForm},
    entity::sea_orm_active_enums::Role,
    error::AppResult,
    forms::FormData,
    middleware::auth::AuthUser,
    response::ApiResponse,
    services::{auth_service, farmer_service},
    state::AppState,
};

const DASHBOARD: &str = "/farmer/dashboard/";

pub fn router() -> Router<AppState> {
    Router::new()
        .route(DASHBOARD, get(dashboard).post(dashboard_action))
        .route("/farmer/delete/{id}/", post(delete_details))
        .route("/farmer/delete-product/{id}/", post(delete_product))
        .route("/farmer/cancel-request/{id}/", post(cancel_request))
}

#[utoipa::path(
    get,
    path = "/farmer/dashboard/",
    responses(
        (status = 200, description = "Farmer dashboard", body = ApiResponse<FarmerDashboard>),
        (status = 303, description = "Not signed in, or not a farmer")
    ),
    security(("bearer_auth" = [])),
    tag = "Farmer"
)]
pub async fn dashboard(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<FarmerDashboard>>> {
    let data = farmer_service::dashboard(&state, &user).await?;
    Ok(Json(ApiResponse::success("Farmer dashboard", data)))
}

/// The pressed button decides the action: `save_farmer`, `add_product`,
/// `update_product`, `send_request`, or `approve_request`/`reject_request`
/// together with `request_id`.
#[utoipa::path(
    post,
    path = "/farmer/dashboard/",
    request_body(content = ProductForm, content_type = "multipart/form-data",
        description = "Fields of the submitted form plus its submit button; product images come as repeated `images` parts"),
    responses(
        (status = 303, description = "Saved, redirects back to the dashboard"),
        (status = 400, description = "Unknown action"),
        (status = 404, description = "Referenced land, product or request not found"),
        (status = 422, description = "Invalid form")
    ),
    security(("bearer_auth" = [])),
    tag = "Farmer"
)]
pub async fn dashboard_action(
    State(state): State<AppState>,
    user: AuthUser,
    mut data: FormData,
) -> AppResult<Redirect> {
    let files = data.take_files("images");
    auth_service::require_role(&state, &user, Role::Farmer).await?;
    match FarmerAction::from_form(&data)? {
        FarmerAction::SaveDetails(form) => {
            farmer_service::save_details(&state, &user, form).await?;
        }
        FarmerAction::AddProduct(form) => {
            farmer_service::add_product(&state, &user, form, files).await?;
        }
        FarmerAction::UpdateProduct { product_id, form } => {
            farmer_service::update_product(&state, &user, &product_id, form).await?;
        }
        FarmerAction::SendRequest(form) => {
            farmer_service::send_land_request(&state, &user, form).await?;
        }
        FarmerAction::DecideProductRequest { request_id, action } => {
            farmer_service::decide_product_request(&state, &user, &request_id, action).await?;
        }
    }
    Ok(Redirect::to(DASHBOARD))
}

#[utoipa::path(
    post,
    path = "/farmer/delete/{id}/",
    params(("id" = String, Path, description = "Farmer details id")),
    responses(
        (status = 303, description = "Deleted"),
        (status = 404, description = "Not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Farmer"
)]
pub async fn delete_details(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Redirect> {
    farmer_service::delete_details(&state, &user, &id).await?;
    Ok(Redirect::to(DASHBOARD))
}

#[utoipa::path(
    post,
    path = "/farmer/delete-product/{id}/",
    params(("id" = String, Path, description = "Product id")),
    responses(
        (status = 303, description = "Deleted with its images and requests"),
        (status = 404, description = "Not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Farmer"
)]
pub async fn delete_product(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Redirect> {
    farmer_service::delete_product(&state, &user, &id).await?;
    Ok(Redirect::to(DASHBOARD))
}

#[utoipa::path(
    post,
    path = "/farmer/cancel-request/{id}/",
    params(("id" = String, Path, description = "Land request id")),
    responses(
        (status = 303, description = "Cancelled, or left as is when no longer pending"),
        (status = 404, description = "Not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Farmer"
)]
pub async fn cancel_request(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Redirect> {
    farmer_service::cancel_land_request(&state, &user, &id).await?;
    Ok(Redirect::to(DASHBOARD))
}
