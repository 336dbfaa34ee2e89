use serde::Serialize;
use serde_json::Value;
use sqlx::{FromRow, PgPool};

use crate::auth::password::{hash_password, verify_password};
use crate::database::manager::DatabaseError;
use crate::database::query_builder::{bind_values, sql_for_partial_update};
use crate::types::{ColumnMap, UpdateMap};

const USER_COLUMNS: &str = "username, first_name, last_name, email, is_admin";

pub const COLUMNS: ColumnMap = ColumnMap::new(&[
    ("firstName", "first_name"),
    ("lastName", "last_name"),
    ("isAdmin", "is_admin"),
]);

/// Public view of a user; the password hash never leaves this module
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub is_admin: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserDetail {
    #[serde(flatten)]
    pub user: User,
    /// Ids of the jobs this user applied to
    pub applications: Vec<i32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub is_admin: bool,
}

#[derive(FromRow)]
struct StoredUser {
    #[sqlx(flatten)]
    user: User,
    password: String,
}

/// Check a username/password pair.
///
/// Unknown users and wrong passwords fail the same way.
pub async fn authenticate(pool: &PgPool, username: &str, password: &str) -> Result<User, DatabaseError> {
    let query = format!("SELECT {}, password FROM users WHERE username = $1", USER_COLUMNS);
    let stored = sqlx::query_as::<_, StoredUser>(&query)
        .bind(username)
        .fetch_optional(pool)
        .await?;

    if let Some(stored) = stored {
        if verify_password(password.to_string(), stored.password).await? {
            return Ok(stored.user);
        }
    }

    tracing::debug!("Rejected credentials for '{}'", username);
    Err(DatabaseError::InvalidCredentials)
}

pub async fn register(pool: &PgPool, user: &NewUser) -> Result<User, DatabaseError> {
    let duplicate = sqlx::query("SELECT username FROM users WHERE username = $1")
        .bind(&user.username)
        .fetch_optional(pool)
        .await?;

    if duplicate.is_some() {
        return Err(DatabaseError::Duplicate(format!("Duplicate username: {}", user.username)));
    }

    let hashed = hash_password(user.password.clone()).await?;

    let query = format!(
        "INSERT INTO users (username, password, first_name, last_name, email, is_admin) \
         VALUES ($1, $2, $3, $4, $5, $6) RETURNING {}",
        USER_COLUMNS
    );
    let created = sqlx::query_as::<_, User>(&query)
        .bind(&user.username)
        .bind(&hashed)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.email)
        .bind(user.is_admin)
        .fetch_one(pool)
        .await?;

    tracing::info!("Registered user {} (admin: {})", created.username, created.is_admin);
    Ok(created)
}

pub async fn find_all(pool: &PgPool) -> Result<Vec<User>, DatabaseError> {
    let query = format!("SELECT {} FROM users ORDER BY username", USER_COLUMNS);
    let users = sqlx::query_as::<_, User>(&query).fetch_all(pool).await?;
    Ok(users)
}

pub async fn get(pool: &PgPool, username: &str) -> Result<UserDetail, DatabaseError> {
    let query = format!("SELECT {} FROM users WHERE username = $1", USER_COLUMNS);
    let user = sqlx::query_as::<_, User>(&query)
        .bind(username)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| not_found(username))?;

    let applications: Vec<i32> =
        sqlx::query_scalar("SELECT job_id FROM applications WHERE username = $1 ORDER BY job_id")
            .bind(username)
            .fetch_all(pool)
            .await?;

    Ok(UserDetail { user, applications })
}

/// Partial update; a new `password` is hashed before it is stored.
pub async fn update(pool: &PgPool, username: &str, data: &UpdateMap) -> Result<User, DatabaseError> {
    let mut data = data.clone();
    if let Some(Value::String(password)) = data.get("password") {
        let hashed = hash_password(password.clone()).await?;
        data.insert("password".to_string(), Value::String(hashed));
    }

    let update = sql_for_partial_update(&data, &COLUMNS)?;
    let query = format!(
        "UPDATE users SET {} WHERE username = {} RETURNING {}",
        update.set_cols,
        update.next_placeholder(),
        USER_COLUMNS
    );
    // values may carry a password hash
    tracing::debug!("User update: {}", query);

    bind_values(sqlx::query_as::<_, User>(&query), &update.values)
        .bind(username)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| not_found(username))
}

pub async fn remove(pool: &PgPool, username: &str) -> Result<(), DatabaseError> {
    let result = sqlx::query("DELETE FROM users WHERE username = $1")
        .bind(username)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(not_found(username));
    }
    tracing::info!("Removed user {}", username);
    Ok(())
}

/// Record that `username` applied to job `job_id`.
pub async fn apply_to_job(pool: &PgPool, username: &str, job_id: i32) -> Result<(), DatabaseError> {
    let job = sqlx::query("SELECT id FROM jobs WHERE id = $1")
        .bind(job_id)
        .fetch_optional(pool)
        .await?;
    if job.is_none() {
        return Err(DatabaseError::NotFound(format!("No job: {}", job_id)));
    }

    let user = sqlx::query("SELECT username FROM users WHERE username = $1")
        .bind(username)
        .fetch_optional(pool)
        .await?;
    if user.is_none() {
        return Err(DatabaseError::NotFound(format!("No username: {}", username)));
    }

    let existing = sqlx::query("SELECT job_id FROM applications WHERE username = $1 AND job_id = $2")
        .bind(username)
        .bind(job_id)
        .fetch_optional(pool)
        .await?;
    if existing.is_some() {
        return Err(DatabaseError::Duplicate(format!("Already applied to job: {}", job_id)));
    }

    sqlx::query("INSERT INTO applications (job_id, username) VALUES ($1, $2)")
        .bind(job_id)
        .bind(username)
        .execute(pool)
        .await?;

    tracing::info!("User {} applied to job {}", username, job_id);
    Ok(())
}

fn not_found(username: &str) -> DatabaseError {
    DatabaseError::NotFound(format!("No user: {}", username))
}
