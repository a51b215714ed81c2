use axum::{
    Json, Router,
    extract::{Path, State},
    response::Redirect,
    routing::{get, post},
};

use crate::{
    dto::customer::{CustomerAction, CustomerDashboard, ProductRequestForm},
    entity::sea_orm_active_enums::Role,
    error::AppResult,
    forms::FormData,
    middleware::auth::AuthUser,
    response::ApiResponse,
    services::{auth_service, customer_service},
    state::AppState,
};

const DASHBOARD: &str = "/customer/dashboard/";

pub fn router() -> Router<AppState> {
    Router::new()
        .route(DASHBOARD, get(dashboard).post(dashboard_action))
        .route("/customer/cancel-request/{id}/", post(cancel_request))
}

#[utoipa::path(
    get,
    path = "/customer/dashboard/",
    responses(
        (status = 200, description = "Customer dashboard", body = ApiResponse<CustomerDashboard>),
        (status = 303, description = "Not signed in, or not a customer")
    ),
    security(("bearer_auth" = [])),
    tag = "Customer"
)]
pub async fn dashboard(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<CustomerDashboard>>> {
    let data = customer_service::dashboard(&state, &user).await?;
    Ok(Json(ApiResponse::success("Customer dashboard", data)))
}

#[utoipa::path(
    post,
    path = "/customer/dashboard/",
    request_body(content = ProductRequestForm, content_type = "application/x-www-form-urlencoded",
        description = "Product request with the `send_request` button"),
    responses(
        (status = 303, description = "Request sent, redirects back to the dashboard"),
        (status = 400, description = "Unknown action"),
        (status = 404, description = "Product not found"),
        (status = 422, description = "Invalid quantity")
    ),
    security(("bearer_auth" = [])),
    tag = "Customer"
)]
pub async fn dashboard_action(
    State(state): State<AppState>,
    user: AuthUser,
    data: FormData,
) -> AppResult<Redirect> {
    auth_service::require_role(&state, &user, Role::Customer).await?;
    match CustomerAction::from_form(&data)? {
        CustomerAction::SendRequest(form) => {
            customer_service::send_product_request(&state, &user, form).await?;
        }
    }
    Ok(Redirect::to(DASHBOARD))
}

#[utoipa::path(
    post,
    path = "/customer/cancel-request/{id}/",
    params(("id" = String, Path, description = "Product request id")),
    responses(
        (status = 303, description = "Cancelled, or left as is when no longer pending"),
        (status = 404, description = "Not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Customer"
)]
pub async fn cancel_request(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Redirect> {
    customer_service::cancel_product_request(&state, &user, &id).await?;
    Ok(Redirect::to(DASHBOARD))
}
