use axum::{Json, Router, extract::State, response::Redirect, routing::get};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    entity::sea_orm_active_enums::Role,
    error::AppResult,
    middleware::auth::AuthUser,
    response::ApiResponse,
    services::auth_service,
    state::AppState,
};

#[derive(Serialize, ToSchema)]
pub struct Landing {
    pub name: String,
    pub signup: String,
    pub login: String,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(landing))
        .route("/dashboard/", get(dispatch))
}

/// Dashboard each role lands on.
pub fn dashboard_path(role: Role) -> &'static str {
    match role {
        Role::Farmer => "/farmer/dashboard/",
        Role::Landowner => "/landowner/dashboard/",
        Role::Customer => "/customer/dashboard/",
    }
}

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Landing page", body = ApiResponse<Landing>)
    ),
    tag = "Pages"
)]
pub async fn landing() -> Json<ApiResponse<Landing>> {
    let data = Landing {
        name: "AgriLink".to_string(),
        signup: "/signup/".to_string(),
        login: "/login/".to_string(),
    };
    Json(ApiResponse::success("Welcome", data))
}

#[utoipa::path(
    get,
    path = "/dashboard/",
    responses(
        (status = 303, description = "Redirects to the dashboard for the caller's role, or to /login/"),
        (status = 404, description = "Account has no profile")
    ),
    security(("bearer_auth" = [])),
    tag = "Pages"
)]
pub async fn dispatch(State(state): State<AppState>, user: AuthUser) -> AppResult<Redirect> {
    let role = auth_service::resolve_role(&state, &user).await?;
    Ok(Redirect::to(dashboard_path(role)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_role_has_its_own_dashboard() {
        assert_eq!(dashboard_path(Role::Farmer), "/farmer/dashboard/");
        assert_eq!(dashboard_path(Role::Landowner), "/landowner/dashboard/");
        assert_eq!(dashboard_path(Role::Customer), "/customer/dashboard/");
    }
}
