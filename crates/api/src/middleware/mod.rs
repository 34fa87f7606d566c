//! HTTP middleware and extractors.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (opens the `http_request` span)
//! 3. Request ID (fills `request_id` into that span)

pub mod id_path;
pub mod request_id;

pub use id_path::IdPath;
pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
