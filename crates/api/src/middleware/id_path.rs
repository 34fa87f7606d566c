//! Path extractor for numeric resource ids.

use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use serde::de::DeserializeOwned;

use crate::error::AppError;

/// Extracts the `{id}` path segment as a typed id.
///
/// Unlike a bare [`Path`], a segment that is not an `i32` is rejected with
/// the JSON error body used everywhere else (400).
///
/// ```rust,ignore
/// async fn show(IdPath(id): IdPath<StateId>) -> Result<Json<State>, AppError> { ... }
/// ```
pub struct IdPath<T>(pub T);

impl<S, T> FromRequestParts<S> for IdPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Path::<T>::from_request_parts(parts, state)
            .await
            .map(|Path(id)| Self(id))
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
    }
}
