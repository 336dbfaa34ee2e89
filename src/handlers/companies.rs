// handlers/companies.rs - /companies routes

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use validator::Validate;

use super::extract::{ValidJson, ValidQuery};
use super::http_url;
use crate::database::company::{self, NewCompany};
use crate::error::ApiError;
use crate::filter::CompanyFilter;
use crate::state::AppState;
use crate::types::{nullable, set_present, UpdateMap};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewCompanyBody {
    #[validate(length(min = 1, max = 25))]
    pub handle: String,
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    pub description: String,
    #[serde(default)]
    #[validate(range(min = 0, message = "numEmployees must be a non-negative integer"))]
    pub num_employees: Option<i32>,
    #[serde(default)]
    #[validate(url, custom(function = "http_url"))]
    pub logo_url: Option<String>,
}

impl From<NewCompanyBody> for NewCompany {
    fn from(body: NewCompanyBody) -> Self {
        NewCompany {
            handle: body.handle,
            name: body.name,
            description: body.description,
            num_employees: body.num_employees,
            logo_url: body.logo_url,
        }
    }
}

/// The handle is immutable; everything else may change
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CompanyUpdate {
    #[serde(default)]
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    #[validate(range(min = 0, message = "numEmployees must be a non-negative integer"))]
    pub num_employees: Option<Option<i32>>,
    #[serde(default, deserialize_with = "nullable")]
    #[validate(url, custom(function = "http_url"))]
    pub logo_url: Option<Option<String>>,
}

impl CompanyUpdate {
    pub fn into_update_map(self) -> UpdateMap {
        let mut data = UpdateMap::new();
        set_present(&mut data, "name", self.name);
        set_present(&mut data, "description", self.description);
        set_present(&mut data, "numEmployees", self.num_employees);
        set_present(&mut data, "logoUrl", self.logo_url);
        data
    }
}

/// POST /companies - admin only
pub async fn create(
    State(state): State<AppState>,
    ValidJson(body): ValidJson<NewCompanyBody>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let company = company::create(&state.pool, &body.into()).await?;
    Ok((StatusCode::CREATED, Json(json!({ "company": company }))))
}

/// GET /companies?nameLike&minEmployees&maxEmployees
pub async fn list(
    State(state): State<AppState>,
    ValidQuery(filter): ValidQuery<CompanyFilter>,
) -> Result<Json<Value>, ApiError> {
    let companies = company::find_all(&state.pool, &filter).await?;
    Ok(Json(json!({ "companies": companies })))
}

/// GET /companies/:handle
pub async fn get(State(state): State<AppState>, Path(handle): Path<String>) -> Result<Json<Value>, ApiError> {
    let company = company::get(&state.pool, &handle).await?;
    Ok(Json(json!({ "company": company })))
}

/// PATCH /companies/:handle - admin only
pub async fn update(
    State(state): State<AppState>,
    Path(handle): Path<String>,
    ValidJson(body): ValidJson<CompanyUpdate>,
) -> Result<Json<Value>, ApiError> {
    let company = company::update(&state.pool, &handle, &body.into_update_map()).await?;
    Ok(Json(json!({ "company": company })))
}

/// DELETE /companies/:handle - admin only
pub async fn remove(State(state): State<AppState>, Path(handle): Path<String>) -> Result<Json<Value>, ApiError> {
    company::remove(&state.pool, &handle).await?;
    Ok(Json(json!({ "deleted": handle })))
}
