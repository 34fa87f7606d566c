//! Application state shared across handlers.

use std::sync::Arc;

use crate::db::Store;

/// Application state shared across all handlers.
///
/// Cheap to clone; handlers borrow the store for the length of a request.
#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn Store>,
}

impl AppState {
    /// Create application state around a store.
    #[must_use]
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Get the store.
    #[must_use]
    pub fn store(&self) -> &dyn Store {
        self.store.as_ref()
    }
}
