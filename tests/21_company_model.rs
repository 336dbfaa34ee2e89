mod common;

use anyhow::Result;
use serde_json::json;
use serial_test::serial;

use common::setup_db;
use jobly_api::database::{company, DatabaseError};
use jobly_api::filter::{CompanyFilter, FilterError};

fn handles(companies: &[company::Company]) -> Vec<&str> {
    companies.iter().map(|c| c.handle.as_str()).collect()
}

#[tokio::test]
#[serial]
async fn create_and_reject_duplicate() -> Result<()> {
    let Some(pool) = setup_db().await else { return Ok(()) };

    let new = company::NewCompany {
        handle: "new".into(),
        name: "New".into(),
        description: "New Description".into(),
        num_employees: Some(1),
        logo_url: Some("http://new.img".into()),
    };
    let created = company::create(&pool, &new).await?;
    assert_eq!(created.handle, "new");
    assert_eq!(created.num_employees, Some(1));

    let err = company::create(&pool, &new).await.unwrap_err();
    assert!(matches!(&err, DatabaseError::Duplicate(msg) if msg == "Duplicate company: new"));
    Ok(())
}

#[tokio::test]
#[serial]
async fn find_all_filters_and_orders_by_name() -> Result<()> {
    let Some(pool) = setup_db().await else { return Ok(()) };

    assert_eq!(handles(&company::find_all(&pool, &CompanyFilter::default()).await?), ["c1", "c2", "c3"]);

    let filter = CompanyFilter { min_employees: Some(2), max_employees: Some(3), name_like: None };
    assert_eq!(handles(&company::find_all(&pool, &filter).await?), ["c2", "c3"]);

    let filter = CompanyFilter { name_like: Some("c1".into()), ..Default::default() };
    assert_eq!(handles(&company::find_all(&pool, &filter).await?), ["c1"]);
    Ok(())
}

#[tokio::test]
#[serial]
async fn find_all_rejects_inverted_employee_range() -> Result<()> {
    let Some(pool) = setup_db().await else { return Ok(()) };

    let filter = CompanyFilter { min_employees: Some(3), max_employees: Some(1), name_like: None };
    let err = company::find_all(&pool, &filter).await.unwrap_err();
    assert!(matches!(err, DatabaseError::Filter(FilterError::InvertedRange)));
    Ok(())
}

#[tokio::test]
#[serial]
async fn get_includes_jobs() -> Result<()> {
    let Some(pool) = setup_db().await else { return Ok(()) };

    let detail = company::get(&pool, "c1").await?;
    assert_eq!(
        serde_json::to_value(&detail)?,
        json!({
            "handle": "c1",
            "name": "C1",
            "description": "Desc1",
            "numEmployees": 1,
            "logoUrl": "http://c1.img",
            "jobs": [{ "id": 1001, "title": "Job1", "salary": 50000, "equity": "0.05" }]
        })
    );

    let err = company::get(&pool, "nope").await.unwrap_err();
    assert!(matches!(&err, DatabaseError::NotFound(msg) if msg == "No company: nope"));
    Ok(())
}

#[tokio::test]
#[serial]
async fn update_maps_camel_case_fields() -> Result<()> {
    let Some(pool) = setup_db().await else { return Ok(()) };

    let data = json!({ "name": "New", "numEmployees": 10, "logoUrl": null });
    let updated = company::update(&pool, "c1", data.as_object().expect("object")).await?;
    assert_eq!(updated.name, "New");
    assert_eq!(updated.num_employees, Some(10));
    assert_eq!(updated.logo_url, None);

    let err = company::update(&pool, "nope", data.as_object().expect("object")).await.unwrap_err();
    assert!(matches!(err, DatabaseError::NotFound(_)));
    Ok(())
}

#[tokio::test]
#[serial]
async fn remove_cascades_to_jobs() -> Result<()> {
    let Some(pool) = setup_db().await else { return Ok(()) };

    company::remove(&pool, "c1").await?;
    let remaining: i64 = sqlx::query_scalar("SELECT count(*) FROM jobs WHERE company_handle = 'c1'")
        .fetch_one(&pool)
        .await?;
    assert_eq!(remaining, 0);
    assert!(matches!(company::remove(&pool, "c1").await, Err(DatabaseError::NotFound(_))));
    Ok(())
}
