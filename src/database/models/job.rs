use serde::Serialize;
use sqlx::{types::BigDecimal, FromRow, PgPool};

use crate::database::manager::DatabaseError;
use crate::database::query_builder::{bind_values, sql_for_partial_update};
use crate::filter::JobFilter;
use crate::types::{ColumnMap, UpdateMap};

use super::serialize_decimal;

const JOB_COLUMNS: &str = "id, title, salary, equity, company_handle";

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    #[serde(serialize_with = "serialize_decimal")]
    pub equity: Option<BigDecimal>,
    pub company_handle: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewJob {
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<BigDecimal>,
    pub company_handle: String,
}

/// Insert a job, refusing a second job with the same title at the same company.
///
/// The duplicate check and the insert are separate statements; two concurrent
/// creates can both pass the check.
pub async fn create(pool: &PgPool, job: &NewJob) -> Result<Job, DatabaseError> {
    let duplicate = sqlx::query("SELECT id FROM jobs WHERE title = $1 AND company_handle = $2")
        .bind(&job.title)
        .bind(&job.company_handle)
        .fetch_optional(pool)
        .await?;

    if duplicate.is_some() {
        return Err(DatabaseError::Duplicate(format!(
            "Duplicate job: {} at {}",
            job.title, job.company_handle
        )));
    }

    let query = format!(
        "INSERT INTO jobs (title, salary, equity, company_handle) VALUES ($1, $2, $3, $4) RETURNING {}",
        JOB_COLUMNS
    );
    let created = sqlx::query_as::<_, Job>(&query)
        .bind(&job.title)
        .bind(job.salary)
        .bind(&job.equity)
        .bind(&job.company_handle)
        .fetch_one(pool)
        .await?;

    tracing::info!("Created job {} ({} at {})", created.id, created.title, created.company_handle);
    Ok(created)
}

/// All jobs matching `filter`, ordered by title
pub async fn find_all(pool: &PgPool, filter: &JobFilter) -> Result<Vec<Job>, DatabaseError> {
    let sql = filter.to_sql(&format!("SELECT {} FROM jobs", JOB_COLUMNS))?;
    tracing::debug!("Job search: {} {:?}", sql.query, sql.params);

    let jobs = bind_values(sqlx::query_as::<_, Job>(&sql.query), &sql.params)
        .fetch_all(pool)
        .await?;
    Ok(jobs)
}

pub async fn get(pool: &PgPool, id: i32) -> Result<Job, DatabaseError> {
    let query = format!("SELECT {} FROM jobs WHERE id = $1", JOB_COLUMNS);
    sqlx::query_as::<_, Job>(&query)
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| not_found(id))
}

/// Partial update of title, salary and/or equity.
///
/// Field names are used as column names verbatim, so only those three may be passed.
pub async fn update(pool: &PgPool, id: i32, data: &UpdateMap) -> Result<Job, DatabaseError> {
    let update = sql_for_partial_update(data, &ColumnMap::EMPTY)?;
    let query = format!(
        "UPDATE jobs SET {} WHERE id = {} RETURNING {}",
        update.set_cols,
        update.next_placeholder(),
        JOB_COLUMNS
    );
    tracing::debug!("Job update: {} {:?}", query, update.values);

    bind_values(sqlx::query_as::<_, Job>(&query), &update.values)
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| not_found(id))
}

pub async fn remove(pool: &PgPool, id: i32) -> Result<(), DatabaseError> {
    let result = sqlx::query("DELETE FROM jobs WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(not_found(id));
    }
    tracing::info!("Removed job {}", id);
    Ok(())
}

fn not_found(id: i32) -> DatabaseError {
    DatabaseError::NotFound(format!("No job: {}", id))
}
