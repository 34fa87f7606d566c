//! State endpoints over the in-memory store.

use axum::http::StatusCode;
use serde_json::json;

use client_directory_integration_tests::TestApp;

#[tokio::test]
async fn test_state_lifecycle() {
    let app = TestApp::in_memory();

    let created = app.post("/states", json!({"name": "Puebla"})).await;
    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(created.body, json!({"id": 1, "name": "Puebla"}));

    let duplicate = app.post("/states", json!({"name": "puebla"})).await;
    assert_eq!(duplicate.status, StatusCode::CONFLICT);
    assert_eq!(duplicate.body["statusCode"], 409);

    let detail = app.get("/states/1").await;
    assert_eq!(detail.status, StatusCode::OK);
    assert_eq!(detail.body, json!({"id": 1, "name": "Puebla", "cities": []}));

    let deleted = app.delete("/states/1").await;
    assert_eq!(deleted.status, StatusCode::OK);
    assert_eq!(deleted.body, json!({"id": 1, "name": "Puebla"}));

    let gone = app.get("/states/1").await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
    assert_eq!(gone.body["error"], "Not Found");
}

#[tokio::test]
async fn test_accented_duplicate_is_rejected() {
    let app = TestApp::in_memory();
    app.create("/states", json!({"name": "México"})).await;

    for name in ["mexico", "MEXICO", "Mexico"] {
        let response = app.post("/states", json!({"name": name})).await;
        assert_eq!(response.status, StatusCode::CONFLICT, "{name}");
    }

    let all = app.get("/states").await;
    assert_eq!(all.body.as_array().map(Vec::len), Some(1));
    assert_eq!(all.body[0]["name"], "México");
}

#[tokio::test]
async fn test_list_is_ordered_by_id() {
    let app = TestApp::in_memory();
    for name in ["Yucatán", "Aguascalientes", "Jalisco"] {
        app.create("/states", json!({"name": name})).await;
    }

    let all = app.get("/states").await;
    let ids: Vec<i64> = all
        .body
        .as_array()
        .into_iter()
        .flatten()
        .filter_map(|s| s["id"].as_i64())
        .collect();
    assert_eq!(ids, vec![1, 2, 3]);
}

#[tokio::test]
async fn test_rename() {
    let app = TestApp::in_memory();
    let puebla = app.create("/states", json!({"name": "Puebla"})).await;
    app.create("/states", json!({"name": "Oaxaca"})).await;

    let same = app
        .patch(&format!("/states/{puebla}"), json!({"name": "PUEBLA"}))
        .await;
    assert_eq!(same.status, StatusCode::OK);
    assert_eq!(same.body["name"], "PUEBLA");

    let clash = app
        .patch(&format!("/states/{puebla}"), json!({"name": "oaxaca"}))
        .await;
    assert_eq!(clash.status, StatusCode::CONFLICT);

    let missing = app.patch("/states/99", json!({"name": "Colima"})).await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_blank_name_is_bad_request() {
    let app = TestApp::in_memory();
    let response = app.post("/states", json!({"name": "   "})).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["message"], "name must not be blank");
}
