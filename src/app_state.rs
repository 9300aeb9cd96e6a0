//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::persistence::GuildStore;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Guild registrations and baselines.
    pub store: Arc<dyn GuildStore>,
}
