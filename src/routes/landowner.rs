use axum::{
    Json, Router,
    extract::{Path, State},
    response::Redirect,
    routing::{get, post},
};

use crate::{
    dto::landowner::{LandForm, LandownerAction, LandownerDashboard},
    entity::sea_orm_active_enums::Role,
    error::AppResult,
    forms::FormData,
    middleware::auth::AuthUser,
    response::ApiResponse,
    services::{auth_service, landowner_service},
    state::AppState,
};

const DASHBOARD: &str = "/landowner/dashboard/";

pub fn router() -> Router<AppState> {
    Router::new()
        .route(DASHBOARD, get(dashboard).post(dashboard_action))
        .route("/landowner/delete-land/{id}/", post(delete_land))
}

#[utoipa::path(
    get,
    path = "/landowner/dashboard/",
    responses(
        (status = 200, description = "Landowner dashboard", body = ApiResponse<LandownerDashboard>),
        (status = 303, description = "Not signed in, or not a landowner")
    ),
    security(("bearer_auth" = [])),
    tag = "Landowner"
)]
pub async fn dashboard(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<LandownerDashboard>>> {
    let data = landowner_service::dashboard(&state, &user).await?;
    Ok(Json(ApiResponse::success("Landowner dashboard", data)))
}

#[utoipa::path(
    post,
    path = "/landowner/dashboard/",
    request_body(content = LandForm, content_type = "multipart/form-data",
        description = "`add_land` or `update_land` (with `land_id`) with land photos as repeated `images` parts, or `request_id` with `approve_request`/`reject_request`"),
    responses(
        (status = 303, description = "Saved, redirects back to the dashboard"),
        (status = 400, description = "Unknown action"),
        (status = 404, description = "Land or request not found"),
        (status = 422, description = "Invalid form")
    ),
    security(("bearer_auth" = [])),
    tag = "Landowner"
)]
pub async fn dashboard_action(
    State(state): State<AppState>,
    user: AuthUser,
    mut data: FormData,
) -> AppResult<Redirect> {
    let files = data.take_files("images");
    auth_service::require_role(&state, &user, Role::Landowner).await?;
    match LandownerAction::from_form(&data)? {
        LandownerAction::AddLand(form) => {
            landowner_service::add_land(&state, &user, form, files).await?;
        }
        LandownerAction::UpdateLand { land_id, form } => {
            landowner_service::update_land(&state, &user, &land_id, form).await?;
        }
        LandownerAction::DecideLandRequest { request_id, action } => {
            landowner_service::decide_land_request(&state, &user, &request_id, action).await?;
        }
    }
    Ok(Redirect::to(DASHBOARD))
}

#[utoipa::path(
    post,
    path = "/landowner/delete-land/{id}/",
    params(("id" = String, Path, description = "Land id")),
    responses(
        (status = 303, description = "Deleted with its photos and requests"),
        (status = 404, description = "Not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Landowner"
)]
pub async fn delete_land(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Redirect> {
    landowner_service::delete_land(&state, &user, &id).await?;
    Ok(Redirect::to(DASHBOARD))
}
