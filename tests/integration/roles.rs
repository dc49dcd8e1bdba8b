use crate::common;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use serde_json::Value;
use serial_test::serial;
use tower::ServiceExt;

async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&body).unwrap();

    (status, json)
}

fn names(json: &Value) -> Vec<String> {
    json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["attributes"]["name"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
#[serial]
async fn test_list_roles() {
    let pool = setup_test_db_or_skip!();
    common::cleanup_test_db(&pool).await;
    let [admin, ..] = common::seed_roles(&pool).await;

    let app = rolekit::presentation::router::app(common::create_test_app_state(pool.clone()));

    let (status, json) = get_json(app, "/api/v1/roles?page[number]=1&page[size]=2").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&json), vec!["Administrator", "Sales Admin"]);

    let first = &json["data"][0];
    assert_eq!(first["type"], "roles");
    assert_eq!(first["id"], admin.to_string());
    assert_eq!(first["attributes"]["isAdmin"], true);
    assert_eq!(first["attributes"]["userCount"], 2);
    assert!(first["attributes"]["createdAt"].is_string());

    assert_eq!(json["meta"]["total"], 4);
    assert_eq!(json["meta"]["page"], 1);
    assert_eq!(json["meta"]["perPage"], 2);
    assert!(json["links"]["next"].is_string());

    common::cleanup_test_db(&pool).await;
}

#[tokio::test]
#[serial]
async fn test_list_roles_with_filter() {
    let pool = setup_test_db_or_skip!();
    common::cleanup_test_db(&pool).await;
    common::seed_roles(&pool).await;

    let app = rolekit::presentation::router::app(common::create_test_app_state(pool.clone()));

    let (status, json) = get_json(app.clone(), "/api/v1/roles?filter=is%3Aadmin").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&json), vec!["Administrator", "Sales Admin"]);

    let (status, json) = get_json(app.clone(), "/api/v1/roles?filter=%21name%3ASales").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&json), vec!["Administrator", "Support"]);

    let (status, json) = get_json(app, "/api/v1/roles?filter=color%3Ablue").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["meta"]["total"], 4);

    common::cleanup_test_db(&pool).await;
}

#[tokio::test]
#[serial]
async fn test_list_all_roles_has_no_pagination() {
    let pool = setup_test_db_or_skip!();
    common::cleanup_test_db(&pool).await;
    common::seed_roles(&pool).await;

    let app = rolekit::presentation::router::app(common::create_test_app_state(pool.clone()));

    let (status, json) = get_json(app, "/api/v1/roles?all=true&sort=-name").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        names(&json),
        vec!["Support", "Sales Team", "Sales Admin", "Administrator"]
    );
    assert_eq!(json["meta"]["total"], 4);
    assert!(json["meta"].get("page").is_none());
    assert!(json.get("links").is_none());

    common::cleanup_test_db(&pool).await;
}

#[tokio::test]
#[serial]
async fn test_list_roles_rejects_invalid_query() {
    let pool = setup_test_db_or_skip!();

    let app = rolekit::presentation::router::app(common::create_test_app_state(pool.clone()));

    let (status, json) = get_json(app.clone(), "/api/v1/roles?sort=password").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(json["errors"].is_array());

    let (status, _) = get_json(app.clone(), "/api/v1/roles?page[size]=1000").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, json) = get_json(
        app,
        "/api/v1/roles?page[number]=9223372036854775807&page[size]=100",
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(json["errors"].is_array());
}

#[tokio::test]
#[serial]
async fn test_lookup_roles() {
    let pool = setup_test_db_or_skip!();
    common::cleanup_test_db(&pool).await;
    common::seed_roles(&pool).await;

    let app = rolekit::presentation::router::app(common::create_test_app_state(pool.clone()));

    let (status, json) = get_json(app.clone(), "/api/v1/roles/lookup?search=Sales&limit=1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&json), vec!["Sales Admin"]);

    let (status, _) = get_json(app, "/api/v1/roles/lookup?limit=-1").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    common::cleanup_test_db(&pool).await;
}

#[tokio::test]
#[serial]
async fn test_user_counts() {
    let pool = setup_test_db_or_skip!();
    common::cleanup_test_db(&pool).await;
    let [admin, sales, _, support] = common::seed_roles(&pool).await;

    let app = rolekit::presentation::router::app(common::create_test_app_state(pool.clone()));

    let uri = format!(
        "/api/v1/roles/user-counts?ids[0]={}&ids[1]={}&ids[2]={}",
        admin, sales, support
    );
    let (status, json) = get_json(app.clone(), &uri).await;
    assert_eq!(status, StatusCode::OK);

    let counts: Vec<(i64, i64)> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| {
            (
                item["roleId"].as_i64().unwrap(),
                item["userCount"].as_i64().unwrap(),
            )
        })
        .collect();
    assert_eq!(counts, vec![(admin, 2), (sales, 3), (support, 0)]);

    let (status, json) = get_json(app, &format!("/api/v1/roles/{}/user-count", sales)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["roleId"], sales);
    assert_eq!(json["data"]["userCount"], 3);

    common::cleanup_test_db(&pool).await;
}

#[tokio::test]
#[serial]
async fn test_user_counts_requires_ids() {
    let pool = setup_test_db_or_skip!();

    let app = rolekit::presentation::router::app(common::create_test_app_state(pool.clone()));

    let (status, _) = get_json(app, "/api/v1/roles/user-counts").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
#[serial]
async fn test_search_commands() {
    let pool = setup_test_db_or_skip!();

    let app = rolekit::presentation::router::app(common::create_test_app_state(pool.clone()));

    let (status, json) = get_json(app, "/api/v1/roles/search-commands").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["meta"]["locale"], "en");

    let labels: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["label"].as_str().unwrap())
        .collect();
    assert_eq!(labels, vec!["is:admin", "name"]);
}

#[tokio::test]
#[serial]
async fn test_french_search_commands() {
    let pool = setup_test_db_or_skip!();
    common::cleanup_test_db(&pool).await;
    common::seed_roles(&pool).await;

    let app = rolekit::presentation::router::app(common::create_localized_app_state(
        pool.clone(),
        "fr",
    ));

    let (status, json) = get_json(app.clone(), "/api/v1/roles?filter=est%3Aadmin").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&json), vec!["Administrator", "Sales Admin"]);

    let (status, json) = get_json(app.clone(), "/api/v1/roles?filter=%21nom%3ASales").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&json), vec!["Administrator", "Support"]);

    let (status, json) = get_json(app.clone(), "/api/v1/roles?filter=is%3Aadmin").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["meta"]["total"], 4);

    let (status, json) = get_json(app, "/api/v1/roles/search-commands").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["meta"]["locale"], "fr");

    let labels: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["label"].as_str().unwrap())
        .collect();
    assert_eq!(labels, vec!["est:admin", "nom"]);

    common::cleanup_test_db(&pool).await;
}
