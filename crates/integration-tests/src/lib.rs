//! Integration tests for the client directory.
//!
//! The tests drive the real router in-process with
//! `tower::ServiceExt::oneshot`, so no server has to be started.
//!
//! # Running Tests
//!
//! ```bash
//! # In-memory store, no setup needed
//! cargo test -p client-directory-integration-tests
//!
//! # Also run the PostgreSQL scenario against a migrated scratch database
//! DIRECTORY_TEST_DATABASE_URL=postgres://localhost/directory_test \
//!     cargo test -p client-directory-integration-tests -- --include-ignored
//! ```

use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use serde_json::Value;
use tower::ServiceExt;

use client_directory_api::db::{MemoryStore, Store};
use client_directory_api::state::AppState;

/// The application router plus a way to call it.
#[derive(Clone)]
pub struct TestApp {
    router: Router,
}

/// A response with its body decoded as JSON (`Value::Null` for non-JSON bodies).
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestApp {
    /// App backed by a fresh in-memory store.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::with_store(Arc::new(MemoryStore::new()))
    }

    /// App backed by the given store.
    #[must_use]
    pub fn with_store(store: Arc<dyn Store>) -> Self {
        Self {
            router: client_directory_api::app(AppState::new(store)),
        }
    }

    /// Send a request and decode the response.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built or the body cannot be read.
    #[allow(clippy::unwrap_used)]
    pub async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> TestResponse {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> TestResponse {
        self.send(Method::POST, uri, Some(body)).await
    }

    pub async fn patch(&self, uri: &str, body: Value) -> TestResponse {
        self.send(Method::PATCH, uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> TestResponse {
        self.send(Method::DELETE, uri, None).await
    }

    /// POST and return the `id` of the created row.
    ///
    /// # Panics
    ///
    /// Panics unless the response is `201 Created` with an integer id.
    #[allow(clippy::unwrap_used)]
    pub async fn create(&self, uri: &str, body: Value) -> i64 {
        let response = self.post(uri, body).await;
        assert_eq!(
            response.status,
            StatusCode::CREATED,
            "POST {uri}: {}",
            response.body
        );
        response.body["id"].as_i64().unwrap()
    }
}
