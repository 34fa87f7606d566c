//! Client Directory API library.
//!
//! REST service over a small directory hierarchy: states contain cities,
//! cities contain locations, and addresses tie clients to locations. The
//! crate is a library so the router can be driven in-process by tests and
//! reused by the CLI; `main.rs` is a thin binary around [`app`].
//!
//! # Layers
//!
//! - [`routes`] - axum handlers, one module per resource
//! - [`services`] - existence checks, validation, duplicate-name rules
//! - [`db`] - the [`Store`](db::Store) trait with `PostgreSQL` and in-memory backends
//! - [`error`] - maps service and store errors to HTTP responses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

use axum::Router;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::state::AppState;

/// Build the full application router.
///
/// Sentry layers are added by the binary so that tests can drive the router
/// without a Sentry hub.
pub fn app(state: AppState) -> Router {
    routes::router()
        .layer(axum::middleware::from_fn(
            middleware::request_id_middleware,
        ))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
}
