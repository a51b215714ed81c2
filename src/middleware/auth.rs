use axum::{extract::FromRequestParts, http::header};
use jsonwebtoken::{DecodingKey, Validation, decode};
use tower_cookies::Cookies;
use uuid::Uuid;

use crate::{
    dto::auth::Claims,
    entity::{profiles::Model as ProfileModel, sea_orm_active_enums::Role},
    error::AppError,
    state::AppState,
};

pub const SESSION_COOKIE: &str = "agrilink_session";

/// Identity of the caller, resolved from the bearer header or session cookie.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub role: Role,
}

/// Role gate for the dashboards. A mismatch sends the user back to the dispatcher.
pub fn ensure_role(profile: &ProfileModel, role: Role) -> Result<(), AppError> {
    if profile.role != role {
        return Err(AppError::WrongRole);
    }
    Ok(())
}

pub fn decode_token(secret: &str, token: &str) -> Result<AuthUser, AppError> {
    let decoded = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|err| {
        tracing::debug!(error = %err, "rejected session token");
        AppError::LoginRequired
    })?;

    let user_id = Uuid::parse_str(&decoded.claims.sub).map_err(|_| AppError::LoginRequired)?;

    Ok(AuthUser {
        user_id,
        role: decoded.claims.role,
    })
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(auth_header) = parts.headers.get(header::AUTHORIZATION) {
            let auth_str = auth_header
                .to_str()
                .map_err(|_| AppError::BadRequest("Invalid Authorization header".into()))?;

            if !auth_str.starts_with("Bearer ") {
                return Err(AppError::BadRequest("Invalid Authorization scheme".into()));
            }
            let token = auth_str.trim_start_matches("Bearer ").trim();
            return decode_token(&state.config.jwt_secret, token);
        }

        let cookies = Cookies::from_request_parts(parts, state)
            .await
            .map_err(|(_, msg)| AppError::Internal(anyhow::anyhow!(msg)))?;
        let cookie = cookies.get(SESSION_COOKIE).ok_or(AppError::LoginRequired)?;
        decode_token(&state.config.jwt_secret, cookie.value())
    }
}
