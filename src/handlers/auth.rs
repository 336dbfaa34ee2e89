// handlers/auth.rs - public token routes

use axum::{extract::State, http::StatusCode, response::Json};
use serde::Deserialize;
use serde_json::{json, Value};

use validator::Validate;

use super::extract::ValidJson;
use crate::auth::create_token;
use crate::database::user::{self, NewUser};
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct TokenRequest {
    #[validate(length(min = 1, max = 25))]
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Self-registration; never grants admin rights
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 25))]
    pub username: String,
    #[validate(length(min = 5, max = 20))]
    pub password: String,
    #[validate(length(min = 1, max = 30))]
    pub first_name: String,
    #[validate(length(min = 1, max = 30))]
    pub last_name: String,
    #[validate(email, length(min = 6, max = 60))]
    pub email: String,
}

/// POST /auth/token - exchange credentials for a JWT
pub async fn token(
    State(state): State<AppState>,
    ValidJson(body): ValidJson<TokenRequest>,
) -> Result<Json<Value>, ApiError> {
    let user = user::authenticate(&state.pool, &body.username, &body.password).await?;
    let token = create_token(&user.username, user.is_admin)?;
    Ok(Json(json!({ "token": token })))
}

/// POST /auth/register - create an account and log it in
pub async fn register(
    State(state): State<AppState>,
    ValidJson(body): ValidJson<RegisterRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let new_user = NewUser {
        username: body.username,
        password: body.password,
        first_name: body.first_name,
        last_name: body.last_name,
        email: body.email,
        is_admin: false,
    };
    let user = user::register(&state.pool, &new_user).await?;
    let token = create_token(&user.username, user.is_admin)?;
    Ok((StatusCode::CREATED, Json(json!({ "token": token }))))
}
