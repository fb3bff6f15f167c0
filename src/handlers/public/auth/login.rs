// handlers/public/auth/login.rs - POST /auth/token and POST /auth/login handlers

use axum::{
    extract::{
        rejection::{FormRejection, JsonRejection},
        State,
    },
    Form, Json,
};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

use super::utils::verify_password;

/// OAuth2 password-grant form. `username` carries the email address; other
/// OAuth2 fields such as `grant_type` and `scope` are accepted and ignored.
#[derive(Deserialize)]
pub struct TokenForm {
    pub username: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

/// POST /auth/token - OAuth2-compatible token endpoint (form encoded)
pub async fn token_post(
    State(state): State<AppState>,
    form: Result<Form<TokenForm>, FormRejection>,
) -> ApiResult<TokenResponse> {
    let Form(form) = form?;
    authenticate(&state, &form.username, form.password)
        .await
        .map(ApiResponse::success)
}

/// POST /auth/login - JSON login, same result as /auth/token
pub async fn login_post(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<TokenResponse> {
    let Json(payload) = payload?;
    authenticate(&state, &payload.email, payload.password)
        .await
        .map(ApiResponse::success)
}

/// Verify credentials and issue a bearer token for the identity.
///
/// Unknown email and wrong password produce the same 401.
async fn authenticate(state: &AppState, email: &str, password: String) -> Result<TokenResponse, ApiError> {
    let Some(user) = state.users.find_by_email(email).await? else {
        tracing::info!("login failed: unknown email");
        return Err(bad_credentials());
    };

    if !verify_password(&state.passwords, password, user.password_hash.clone()).await {
        tracing::info!(user_id = %user.id, "login failed: password mismatch");
        return Err(bad_credentials());
    }

    let access_token = state.tokens.issue_default(&user.id.to_string())?;
    tracing::info!(user_id = %user.id, "issued access token");

    Ok(TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
    })
}

fn bad_credentials() -> ApiError {
    ApiError::unauthorized("Incorrect email or password")
}
