use axum::{
    Json, Router,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Redirect},
    routing::{get, post},
};
use sea_orm::Iterable;
use tower_cookies::{Cookie, Cookies, cookie::SameSite};

use crate::{
    dto::auth::{LoginForm, LoginPage, LoginResponse, SignupForm, SignupPage},
    entity::sea_orm_active_enums::Role,
    error::AppResult,
    forms::FormData,
    middleware::auth::SESSION_COOKIE,
    response::ApiResponse,
    services::auth_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/signup/", get(signup_page).post(signup))
        .route("/login/", get(login_page).post(login))
        .route("/logout/", post(logout))
}

fn set_session(cookies: &Cookies, token: String) {
    let mut cookie = Cookie::new(SESSION_COOKIE, token);
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Lax);
    cookies.add(cookie);
}

#[utoipa::path(
    get,
    path = "/signup/",
    responses(
        (status = 200, description = "Signup form fields and roles", body = ApiResponse<SignupPage>)
    ),
    tag = "Auth"
)]
pub async fn signup_page() -> Json<ApiResponse<SignupPage>> {
    let page = SignupPage {
        fields: ["name", "phone", "email", "password", "user_type"]
            .map(String::from)
            .to_vec(),
        roles: Role::iter().collect(),
    };
    Json(ApiResponse::success("Sign up", page))
}

#[utoipa::path(
    post,
    path = "/signup/",
    request_body(content = SignupForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Registered and signed in, redirects to /dashboard/"),
        (status = 422, description = "Invalid form or email already taken")
    ),
    tag = "Auth"
)]
pub async fn signup(
    State(state): State<AppState>,
    cookies: Cookies,
    data: FormData,
) -> AppResult<Redirect> {
    let form: SignupForm = data.bind()?;
    let resp = auth_service::signup(&state, form).await?;
    set_session(&cookies, resp.token);
    Ok(Redirect::to("/dashboard/"))
}

#[utoipa::path(
    get,
    path = "/login/",
    responses(
        (status = 200, description = "Login form fields", body = ApiResponse<LoginPage>)
    ),
    tag = "Auth"
)]
pub async fn login_page() -> Json<ApiResponse<LoginPage>> {
    let page = LoginPage {
        fields: vec!["username".to_string(), "password".to_string()],
    };
    Json(ApiResponse::success("Log in", page))
}

#[utoipa::path(
    post,
    path = "/login/",
    request_body(content = LoginForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Signed in, redirects to /dashboard/", body = ApiResponse<LoginResponse>),
        (status = 400, description = "Invalid email or password")
    ),
    tag = "Auth"
)]
pub async fn login(
    State(state): State<AppState>,
    cookies: Cookies,
    data: FormData,
) -> AppResult<impl IntoResponse> {
    let form: LoginForm = data.bind()?;
    let resp = auth_service::login(&state, form).await?;
    set_session(&cookies, resp.token.clone());

    Ok((
        StatusCode::SEE_OTHER,
        [(header::LOCATION, "/dashboard/")],
        Json(ApiResponse::success("Logged in", resp)),
    ))
}

#[utoipa::path(
    post,
    path = "/logout/",
    responses(
        (status = 303, description = "Session cleared, redirects to /")
    ),
    tag = "Auth"
)]
pub async fn logout(cookies: Cookies) -> Redirect {
    let mut cookie = Cookie::new(SESSION_COOKIE, "");
    cookie.set_path("/");
    cookies.remove(cookie);
    Redirect::to("/")
}
