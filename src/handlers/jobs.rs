// handlers/jobs.rs - /jobs routes

use std::str::FromStr;

use axum::{extract::State, http::StatusCode, response::Json};
use serde::Deserialize;
use serde_json::{json, Value};
use sqlx::types::BigDecimal;

use validator::Validate;

use super::extract::{ValidJson, ValidPath, ValidQuery};
use crate::database::job::{self, NewJob};
use crate::error::ApiError;
use crate::filter::JobFilter;
use crate::state::AppState;
use crate::types::{nullable, set_present, UpdateMap};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewJobBody {
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: String,
    #[serde(default)]
    #[validate(range(min = 0, message = "salary must be a non-negative integer"))]
    pub salary: Option<i32>,
    #[serde(default)]
    #[validate(range(min = 0.0, max = 1.0, message = "equity must be between 0 and 1"))]
    pub equity: Option<f64>,
    #[validate(length(min = 1, max = 25))]
    pub company_handle: String,
}

/// Fields an admin may change on an existing job
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct JobUpdate {
    #[serde(default)]
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    #[validate(range(min = 0, message = "salary must be a non-negative integer"))]
    pub salary: Option<Option<i32>>,
    #[serde(default, deserialize_with = "nullable")]
    #[validate(range(min = 0.0, max = 1.0, message = "equity must be between 0 and 1"))]
    pub equity: Option<Option<f64>>,
}

impl JobUpdate {
    pub fn into_update_map(self) -> UpdateMap {
        let mut data = UpdateMap::new();
        set_present(&mut data, "title", self.title);
        set_present(&mut data, "salary", self.salary);
        set_present(&mut data, "equity", self.equity);
        data
    }
}

impl TryFrom<NewJobBody> for NewJob {
    type Error = ApiError;

    fn try_from(body: NewJobBody) -> Result<Self, Self::Error> {
        // through the shortest decimal rendering, so 0.1 stays 0.1
        let equity = body
            .equity
            .map(|e| BigDecimal::from_str(&e.to_string()))
            .transpose()
            .map_err(|_| ApiError::bad_request("equity must be a number"))?;

        Ok(NewJob {
            title: body.title,
            salary: body.salary,
            equity,
            company_handle: body.company_handle,
        })
    }
}

/// POST /jobs - admin only
pub async fn create(
    State(state): State<AppState>,
    ValidJson(body): ValidJson<NewJobBody>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let new_job = NewJob::try_from(body)?;
    let job = job::create(&state.pool, &new_job).await?;
    Ok((StatusCode::CREATED, Json(json!({ "job": job }))))
}

/// GET /jobs?minSalary&hasEquity&titleLike
pub async fn list(
    State(state): State<AppState>,
    ValidQuery(filter): ValidQuery<JobFilter>,
) -> Result<Json<Value>, ApiError> {
    let jobs = job::find_all(&state.pool, &filter).await?;
    Ok(Json(json!({ "jobs": jobs })))
}

/// GET /jobs/:id
pub async fn get(State(state): State<AppState>, ValidPath(id): ValidPath<i32>) -> Result<Json<Value>, ApiError> {
    let job = job::get(&state.pool, id).await?;
    Ok(Json(json!({ "job": job })))
}

/// PATCH /jobs/:id - admin only
pub async fn update(
    State(state): State<AppState>,
    ValidPath(id): ValidPath<i32>,
    ValidJson(body): ValidJson<JobUpdate>,
) -> Result<Json<Value>, ApiError> {
    let job = job::update(&state.pool, id, &body.into_update_map()).await?;
    Ok(Json(json!({ "job": job })))
}

/// DELETE /jobs/:id - admin only
pub async fn remove(State(state): State<AppState>, ValidPath(id): ValidPath<i32>) -> Result<Json<Value>, ApiError> {
    job::remove(&state.pool, id).await?;
    Ok(Json(json!({ "deleted": id.to_string() })))
}
