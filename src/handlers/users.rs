// handlers/users.rs - /users routes
//
// Listing and creating users is for admins; the per-user routes accept the
// user themselves or an admin.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    Extension,
};
use serde::Deserialize;
use serde_json::{json, Value};

use validator::Validate;

use super::extract::{ValidJson, ValidPath};
use crate::auth::create_token;
use crate::database::user::{self, NewUser};
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::state::AppState;
use crate::types::{set_present, UpdateMap};

/// Admin-created account; unlike self-registration it may grant admin rights
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewUserBody {
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
    #[serde(default)]
    pub is_admin: bool,
}

impl From<NewUserBody> for NewUser {
    fn from(body: NewUserBody) -> Self {
        NewUser {
            username: body.username,
            password: body.password,
            first_name: body.first_name,
            last_name: body.last_name,
            email: body.email,
            is_admin: body.is_admin,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UserUpdate {
    #[serde(default)]
    #[validate(length(min = 5, max = 20))]
    pub password: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, max = 30))]
    pub first_name: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, max = 30))]
    pub last_name: Option<String>,
    #[serde(default)]
    #[validate(email, length(min = 6, max = 60))]
    pub email: Option<String>,
    #[serde(default)]
    pub is_admin: Option<bool>,
}

impl UserUpdate {
    pub fn into_update_map(self) -> UpdateMap {
        let mut data = UpdateMap::new();
        set_present(&mut data, "password", self.password);
        set_present(&mut data, "firstName", self.first_name);
        set_present(&mut data, "lastName", self.last_name);
        set_present(&mut data, "email", self.email);
        set_present(&mut data, "isAdmin", self.is_admin);
        data
    }
}

/// POST /users - admin only. Returns the new user and a token for them.
pub async fn create(
    State(state): State<AppState>,
    ValidJson(body): ValidJson<NewUserBody>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let user = user::register(&state.pool, &body.into()).await?;
    let token = create_token(&user.username, user.is_admin)?;
    Ok((StatusCode::CREATED, Json(json!({ "user": user, "token": token }))))
}

/// GET /users - admin only
pub async fn list(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let users = user::find_all(&state.pool).await?;
    Ok(Json(json!({ "users": users })))
}

/// GET /users/:username
pub async fn get(State(state): State<AppState>, Path(username): Path<String>) -> Result<Json<Value>, ApiError> {
    let user = user::get(&state.pool, &username).await?;
    Ok(Json(json!({ "user": user })))
}

/// PATCH /users/:username
pub async fn update(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path(username): Path<String>,
    ValidJson(body): ValidJson<UserUpdate>,
) -> Result<Json<Value>, ApiError> {
    if body.is_admin.is_some() && !caller.is_admin {
        return Err(ApiError::forbidden("Only admins may change admin rights"));
    }
    let user = user::update(&state.pool, &username, &body.into_update_map()).await?;
    Ok(Json(json!({ "user": user })))
}

/// DELETE /users/:username
pub async fn remove(State(state): State<AppState>, Path(username): Path<String>) -> Result<Json<Value>, ApiError> {
    user::remove(&state.pool, &username).await?;
    Ok(Json(json!({ "deleted": username })))
}

/// POST /users/:username/jobs/:id
pub async fn apply(
    State(state): State<AppState>,
    ValidPath((username, job_id)): ValidPath<(String, i32)>,
) -> Result<Json<Value>, ApiError> {
    user::apply_to_job(&state.pool, &username, job_id).await?;
    Ok(Json(json!({ "applied": job_id })))
}
