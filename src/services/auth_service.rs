use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use password_hash::rand_core::OsRng;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, Set, SqlErr,
    TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit,
    config::AppConfig,
    dto::auth::{Claims, LoginForm, LoginResponse, SignupForm},
    entity::{
        profiles::{self, Entity as Profiles, Model as ProfileModel},
        sea_orm_active_enums::Role,
        users::{self, Entity as Users},
    },
    error::{AppError, AppResult},
    forms::FieldErrors,
    middleware::auth::{AuthUser, ensure_role},
    state::AppState,
};

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Creates the account and its profile together, then opens a session.
pub async fn signup(state: &AppState, form: SignupForm) -> AppResult<LoginResponse> {
    let input = form.clean()?;

    let exist = Users::find()
        .filter(users::Column::Email.eq(input.email.as_str()))
        .one(&state.orm)
        .await?;
    if exist.is_some() {
        return Err(email_taken());
    }

    let password_hash = hash_password(&input.password)?;

    let txn = state.orm.begin().await?;
    let user = users::ActiveModel {
        id: Set(Uuid::new_v4()),
        email: Set(input.email),
        name: Set(input.name),
        password_hash: Set(password_hash),
        created_at: Set(Utc::now().into()),
    }
    .insert(&txn)
    .await
    .map_err(user_insert_error)?;
    let profile = profiles::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user.id),
        phone: Set(input.phone),
        role: Set(input.role),
    }
    .insert(&txn)
    .await?;
    txn.commit().await?;

    tracing::info!(user_id = %user.id, role = ?profile.role, "user registered");
    audit::record(
        &state.orm,
        user.id,
        "user_register",
        "users",
        serde_json::json!({ "user_id": user.id, "role": profile.role }),
    )
    .await;

    let token = issue_token(&state.config, user.id, profile.role)?;
    Ok(LoginResponse {
        token,
        user: user.into(),
        profile: profile.into(),
    })
}

fn email_taken() -> AppError {
    FieldErrors::single("email", "A user with that email already exists.").into()
}

/// Maps a unique violation on `users.email` to the same field error the
/// lookup gives, for signups that race past it.
pub fn user_insert_error(err: DbErr) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => email_taken(),
        _ => err.into(),
    }
}

/// Unknown email and wrong password answer the same message.
pub async fn login(state: &AppState, form: LoginForm) -> AppResult<LoginResponse> {
    let LoginForm { username, password } = form;
    let user = Users::find()
        .filter(users::Column::Email.eq(username.trim().to_lowercase()))
        .one(&state.orm)
        .await?;

    let user = match user {
        Some(u) => u,
        None => return Err(AppError::BadRequest(INVALID_CREDENTIALS.into())),
    };

    let parsed_hash = PasswordHash::new(&user.password_hash)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid password hash")))?;

    let argon2 = Argon2::default();
    if argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_err()
    {
        return Err(AppError::BadRequest(INVALID_CREDENTIALS.into()));
    }

    let profile = find_profile(&state.orm, user.id).await?;
    let token = issue_token(&state.config, user.id, profile.role)?;

    audit::record(
        &state.orm,
        user.id,
        "user_login",
        "users",
        serde_json::json!({ "user_id": user.id }),
    )
    .await;

    Ok(LoginResponse {
        token,
        user: user.into(),
        profile: profile.into(),
    })
}

/// Role stored on the caller's profile, used by the dashboard dispatcher.
pub async fn resolve_role(state: &AppState, user: &AuthUser) -> AppResult<Role> {
    let profile = find_profile(&state.orm, user.user_id).await?;
    Ok(profile.role)
}

/// Loads the caller's profile and checks it carries `role`.
pub async fn require_role(
    state: &AppState,
    user: &AuthUser,
    role: Role,
) -> AppResult<ProfileModel> {
    let profile = find_profile(&state.orm, user.user_id).await?;
    ensure_role(&profile, role)?;
    Ok(profile)
}

pub async fn find_profile<C>(db: &C, user_id: Uuid) -> AppResult<ProfileModel>
where
    C: ConnectionTrait,
{
    Profiles::find()
        .filter(profiles::Column::UserId.eq(user_id))
        .one(db)
        .await?
        .ok_or(AppError::NotFound)
}

pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
        .to_string();
    Ok(hash)
}

pub fn issue_token(config: &AppConfig, user_id: Uuid, role: Role) -> AppResult<String> {
    let expiration = Utc::now()
        .checked_add_signed(Duration::hours(config.session_ttl_hours))
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to set expiration")))?;

    let claims = Claims {
        sub: user_id.to_string(),
        role,
        exp: expiration.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))
}
