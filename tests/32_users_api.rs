mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};
use serial_test::serial;

use common::setup_app;

#[tokio::test]
#[serial]
async fn admin_creates_user_with_token() -> Result<()> {
    let Some(app) = setup_app().await? else { return Ok(()) };
    let new_user = json!({
        "username": "u-new",
        "firstName": "First-new",
        "lastName": "Last-newL",
        "password": "password-new",
        "email": "new@email.com",
        "isAdmin": true
    });

    let res = app
        .client
        .post(app.url("/users"))
        .bearer_auth(&app.admin_token)
        .json(&new_user)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = res.json().await?;
    assert_eq!(
        body["user"],
        json!({
            "username": "u-new",
            "firstName": "First-new",
            "lastName": "Last-newL",
            "email": "new@email.com",
            "isAdmin": true
        })
    );
    assert!(body["token"].is_string());

    let res = app
        .client
        .post(app.url("/users"))
        .bearer_auth(&app.u1_token)
        .json(&new_user)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = app
        .client
        .post(app.url("/users"))
        .bearer_auth(&app.admin_token)
        .json(&json!({ "username": "u-new2", "password": "password", "firstName": "F", "lastName": "L", "email": "not-an-email" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
#[serial]
async fn list_users_is_admin_only() -> Result<()> {
    let Some(app) = setup_app().await? else { return Ok(()) };

    let res = app.client.get(app.url("/users")).bearer_auth(&app.admin_token).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    let names: Vec<&str> = body["users"]
        .as_array()
        .map(|users| users.iter().filter_map(|u| u["username"].as_str()).collect())
        .unwrap_or_default();
    assert_eq!(names, ["admin", "u1", "u2"]);
    assert!(body["users"][0].get("password").is_none());

    let res = app.client.get(app.url("/users")).bearer_auth(&app.u1_token).send().await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = app.client.get(app.url("/users")).send().await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
#[serial]
async fn get_user_self_or_admin() -> Result<()> {
    let Some(app) = setup_app().await? else { return Ok(()) };
    let expected = json!({
        "user": {
            "username": "u1",
            "firstName": "U1F",
            "lastName": "U1L",
            "email": "u1@user.com",
            "isAdmin": false,
            "applications": [1001]
        }
    });

    for token in [&app.u1_token, &app.admin_token] {
        let res = app.client.get(app.url("/users/u1")).bearer_auth(token).send().await?;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(res.json::<Value>().await?, expected);
    }

    let res = app.client.get(app.url("/users/u2")).bearer_auth(&app.u1_token).send().await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = app.client.get(app.url("/users/u1")).send().await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = app.client.get(app.url("/users/nope")).bearer_auth(&app.admin_token).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
#[serial]
async fn patch_user() -> Result<()> {
    let Some(app) = setup_app().await? else { return Ok(()) };

    let res = app
        .client
        .patch(app.url("/users/u1"))
        .bearer_auth(&app.u1_token)
        .json(&json!({ "firstName": "New", "password": "new-password" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["user"]["firstName"], "New");
    assert!(body["user"].get("password").is_none());

    // the new password works for logging in
    let res = app
        .client
        .post(app.url("/auth/token"))
        .json(&json!({ "username": "u1", "password": "new-password" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let res = app
        .client
        .patch(app.url("/users/u1"))
        .bearer_auth(&app.u1_token)
        .json(&json!({ "isAdmin": true }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = app
        .client
        .patch(app.url("/users/u1"))
        .bearer_auth(&app.admin_token)
        .json(&json!({ "isAdmin": true }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let res = app
        .client
        .patch(app.url("/users/u1"))
        .bearer_auth(&app.admin_token)
        .json(&json!({ "username": "renamed" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = app
        .client
        .patch(app.url("/users/u2"))
        .bearer_auth(&app.u1_token)
        .json(&json!({ "firstName": "x" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
#[serial]
async fn delete_user() -> Result<()> {
    let Some(app) = setup_app().await? else { return Ok(()) };

    let res = app.client.delete(app.url("/users/u2")).bearer_auth(&app.u1_token).send().await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = app.client.delete(app.url("/users/u1")).bearer_auth(&app.u1_token).send().await?;
    assert_eq!(res.json::<Value>().await?, json!({ "deleted": "u1" }));

    let res = app.client.delete(app.url("/users/u1")).bearer_auth(&app.admin_token).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
#[serial]
async fn apply_for_job() -> Result<()> {
    let Some(app) = setup_app().await? else { return Ok(()) };

    let res = app
        .client
        .post(app.url("/users/u1/jobs/1002"))
        .bearer_auth(&app.u1_token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.json::<Value>().await?, json!({ "applied": 1002 }));

    let res = app
        .client
        .post(app.url("/users/u1/jobs/1002"))
        .bearer_auth(&app.u1_token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = app
        .client
        .post(app.url("/users/u2/jobs/1002"))
        .bearer_auth(&app.u1_token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = app
        .client
        .post(app.url("/users/u1/jobs/9999"))
        .bearer_auth(&app.admin_token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}
