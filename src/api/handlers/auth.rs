use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
    Argon2,
};
use axum::{extract::State, response::IntoResponse, Json};
use std::sync::Arc;
use tracing::info;

use crate::api::dtos::{
    requests::RegisterRequest,
    responses::{LoginResponse, RegisteredResponse},
};
use crate::api::extractors::auth::AuthUser;
use crate::domain::models::user::User;
use crate::domain::services::validation;
use crate::error::{AppError, FieldError};
use crate::state::AppState;

pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut errors = validation::validate_registration(
        &payload.username,
        &payload.password,
        &payload.email,
        payload.displayname.as_deref(),
    );

    if errors.is_empty() {
        if state.user_repo.find_by_username(&payload.username).await?.is_some() {
            errors.push(FieldError::new("username", "Username is already taken."));
        }
        if state.user_repo.find_by_email(&payload.email).await?.is_some() {
            errors.push(FieldError::new("email", "Email is already taken."));
        }
    }
    if !errors.is_empty() {
        return Err(AppError::ValidationErrors(errors));
    }

    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(payload.password.as_bytes(), &salt)
        .map_err(|_| AppError::Internal)?
        .to_string();

    let displayname = payload.displayname.filter(|d| !d.is_empty());
    let user = User::new(payload.username, password_hash, payload.email, displayname);
    let created = state.user_repo.create(&user).await?;

    info!("Registered user: {}", created.id);

    Ok(Json(RegisteredResponse { id: created.id }))
}

/// Succeeds whenever the Basic credentials resolve; the extractor does the
/// actual checking.
pub async fn login(AuthUser(user): AuthUser) -> Result<impl IntoResponse, AppError> {
    Ok(Json(LoginResponse {
        id: user.id,
        displayname: user.displayname,
    }))
}
