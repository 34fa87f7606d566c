//! Cross-cutting HTTP behavior: id parsing, missing rows, health, request ids.

use axum::http::{Method, StatusCode};
use serde_json::json;

use client_directory_integration_tests::TestApp;

const RESOURCES: [&str; 5] = ["states", "cities", "locations", "clients", "addresses"];

#[tokio::test]
async fn test_missing_ids_are_not_found_everywhere() {
    let app = TestApp::in_memory();

    for resource in RESOURCES {
        let uri = format!("/{resource}/404");
        assert_eq!(app.get(&uri).await.status, StatusCode::NOT_FOUND, "GET {uri}");
        assert_eq!(
            app.patch(&uri, json!({})).await.status,
            StatusCode::NOT_FOUND,
            "PATCH {uri}"
        );
        assert_eq!(
            app.delete(&uri).await.status,
            StatusCode::NOT_FOUND,
            "DELETE {uri}"
        );
    }
}

#[tokio::test]
async fn test_non_integer_id_is_bad_request() {
    let app = TestApp::in_memory();

    for resource in RESOURCES {
        for id in ["abc", "1.5", "99999999999"] {
            let response = app.get(&format!("/{resource}/{id}")).await;
            assert_eq!(response.status, StatusCode::BAD_REQUEST, "{resource}/{id}");
            assert_eq!(response.body["statusCode"], 400);
        }
    }
}

#[tokio::test]
async fn test_empty_lists() {
    let app = TestApp::in_memory();
    for resource in RESOURCES {
        let response = app.get(&format!("/{resource}")).await;
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body, json!([]));
    }
}

#[tokio::test]
async fn test_health_endpoints() {
    let app = TestApp::in_memory();
    assert_eq!(app.get("/health").await.status, StatusCode::OK);
    assert_eq!(app.get("/health/ready").await.status, StatusCode::OK);
}

#[tokio::test]
async fn test_unknown_route() {
    let app = TestApp::in_memory();
    let response = app.send(Method::PUT, "/states/1", Some(json!({}))).await;
    assert_eq!(response.status, StatusCode::METHOD_NOT_ALLOWED);
}
