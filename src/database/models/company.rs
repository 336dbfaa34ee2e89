use serde::Serialize;
use sqlx::{types::BigDecimal, FromRow, PgPool};

use crate::database::manager::DatabaseError;
use crate::database::query_builder::{bind_values, sql_for_partial_update};
use crate::filter::CompanyFilter;
use crate::types::{ColumnMap, UpdateMap};

use super::serialize_decimal;

const COMPANY_COLUMNS: &str = "handle, name, description, num_employees, logo_url";

/// External field names that differ from their column names
pub const COLUMNS: ColumnMap = ColumnMap::new(&[
    ("numEmployees", "num_employees"),
    ("logoUrl", "logo_url"),
]);

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub handle: String,
    pub name: String,
    pub description: String,
    pub num_employees: Option<i32>,
    pub logo_url: Option<String>,
}

/// Job summary listed under a company
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct CompanyJob {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    #[serde(serialize_with = "serialize_decimal")]
    pub equity: Option<BigDecimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompanyDetail {
    #[serde(flatten)]
    pub company: Company,
    pub jobs: Vec<CompanyJob>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewCompany {
    pub handle: String,
    pub name: String,
    pub description: String,
    pub num_employees: Option<i32>,
    pub logo_url: Option<String>,
}

pub async fn create(pool: &PgPool, company: &NewCompany) -> Result<Company, DatabaseError> {
    let duplicate = sqlx::query("SELECT handle FROM companies WHERE handle = $1")
        .bind(&company.handle)
        .fetch_optional(pool)
        .await?;

    if duplicate.is_some() {
        return Err(DatabaseError::Duplicate(format!("Duplicate company: {}", company.handle)));
    }

    let query = format!(
        "INSERT INTO companies (handle, name, description, num_employees, logo_url) \
         VALUES ($1, $2, $3, $4, $5) RETURNING {}",
        COMPANY_COLUMNS
    );
    let created = sqlx::query_as::<_, Company>(&query)
        .bind(&company.handle)
        .bind(&company.name)
        .bind(&company.description)
        .bind(company.num_employees)
        .bind(&company.logo_url)
        .fetch_one(pool)
        .await?;

    tracing::info!("Created company {}", created.handle);
    Ok(created)
}

pub async fn find_all(pool: &PgPool, filter: &CompanyFilter) -> Result<Vec<Company>, DatabaseError> {
    let sql = filter.to_sql(&format!("SELECT {} FROM companies", COMPANY_COLUMNS))?;
    tracing::debug!("Company search: {} {:?}", sql.query, sql.params);

    let companies = bind_values(sqlx::query_as::<_, Company>(&sql.query), &sql.params)
        .fetch_all(pool)
        .await?;
    Ok(companies)
}

/// Company with its jobs ordered by id
pub async fn get(pool: &PgPool, handle: &str) -> Result<CompanyDetail, DatabaseError> {
    let query = format!("SELECT {} FROM companies WHERE handle = $1", COMPANY_COLUMNS);
    let company = sqlx::query_as::<_, Company>(&query)
        .bind(handle)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| not_found(handle))?;

    let jobs = sqlx::query_as::<_, CompanyJob>(
        "SELECT id, title, salary, equity FROM jobs WHERE company_handle = $1 ORDER BY id",
    )
    .bind(handle)
    .fetch_all(pool)
    .await?;

    Ok(CompanyDetail { company, jobs })
}

pub async fn update(pool: &PgPool, handle: &str, data: &UpdateMap) -> Result<Company, DatabaseError> {
    let update = sql_for_partial_update(data, &COLUMNS)?;
    let query = format!(
        "UPDATE companies SET {} WHERE handle = {} RETURNING {}",
        update.set_cols,
        update.next_placeholder(),
        COMPANY_COLUMNS
    );
    tracing::debug!("Company update: {} {:?}", query, update.values);

    bind_values(sqlx::query_as::<_, Company>(&query), &update.values)
        .bind(handle)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| not_found(handle))
}

/// Delete a company; its jobs go with it
pub async fn remove(pool: &PgPool, handle: &str) -> Result<(), DatabaseError> {
    let result = sqlx::query("DELETE FROM companies WHERE handle = $1")
        .bind(handle)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(not_found(handle));
    }
    tracing::info!("Removed company {}", handle);
    Ok(())
}

fn not_found(handle: &str) -> DatabaseError {
    DatabaseError::NotFound(format!("No company: {}", handle))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_camel_case_fields_to_columns() {
        assert_eq!(COLUMNS.column("numEmployees"), "num_employees");
        assert_eq!(COLUMNS.column("logoUrl"), "logo_url");
        assert_eq!(COLUMNS.column("name"), "name");
    }

    #[test]
    fn detail_flattens_company_fields() {
        let detail = CompanyDetail {
            company: Company {
                handle: "c1".into(),
                name: "C1".into(),
                description: "Desc1".into(),
                num_employees: Some(1),
                logo_url: None,
            },
            jobs: vec![],
        };
        let value = serde_json::to_value(&detail).unwrap();
        assert_eq!(value["handle"], "c1");
        assert_eq!(value["numEmployees"], 1);
        assert!(value["logoUrl"].is_null());
        assert_eq!(value["jobs"], serde_json::json!([]));
    }
}
