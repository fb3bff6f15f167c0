// handlers/public/auth/signup.rs - POST /auth/signup handler

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::database::models::{NewUser, UserRecord};
use crate::database::StoreError;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

use super::utils::{hash_password, validate_signup_fields};

#[derive(Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub username: String,
    pub password: String,
}

/// Public view of an identity; never includes the password hash.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

impl From<UserRecord> for UserResponse {
    fn from(user: UserRecord) -> Self {
        Self {
            id: user.id,
            email: user.email,
            username: user.username,
            created_at: user.created_at,
        }
    }
}

/// POST /auth/signup - Create an identity
///
/// Returns 201 with the public user view, or 400 when the email is already
/// registered. The plaintext password only ever reaches the password hasher.
pub async fn signup_post(
    State(state): State<AppState>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> ApiResult<UserResponse> {
    let Json(payload) = payload?;
    validate_signup_fields(&payload.email, &payload.username, &payload.password)?;

    if state.users.find_by_email(&payload.email).await?.is_some() {
        tracing::info!("signup rejected: email already registered");
        return Err(email_taken());
    }

    let password_hash = hash_password(&state.passwords, payload.password).await?;

    let new_user = NewUser {
        email: payload.email,
        username: payload.username,
        password_hash,
    };

    let user = match state.users.insert(new_user).await {
        Ok(user) => user,
        // Lost a race with a concurrent signup for the same email
        Err(StoreError::Remote { status: 409, .. }) => return Err(email_taken()),
        Err(e) => return Err(e.into()),
    };

    tracing::info!(user_id = %user.id, "registered new user");
    Ok(ApiResponse::created(UserResponse::from(user)))
}

fn email_taken() -> ApiError {
    ApiError::conflict("Email already registered")
}
