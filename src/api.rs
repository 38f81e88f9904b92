//! HTTP API for the travel client
//!
//! Thin layer over [`ClientHandle`]: handlers translate requests into client
//! events and read views back from the runtime snapshot.

mod handlers;
mod sse;
mod types;

pub use handlers::create_router;
#[allow(unused_imports)] // Public API re-exports
pub use types::*;

use crate::config::ClientConfig;
use crate::identity::IdentityProvider;
use crate::listings::ListingsContext;
use crate::runtime::ClientHandle;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub client: ClientHandle,
    pub identity: Arc<dyn IdentityProvider>,
    pub listings: Arc<ListingsContext>,
    pub config: Arc<ClientConfig>,
}

impl AppState {
    pub fn new(
        client: ClientHandle,
        identity: Arc<dyn IdentityProvider>,
        listings: ListingsContext,
        config: ClientConfig,
    ) -> Self {
        Self {
            client,
            identity,
            listings: Arc::new(listings),
            config: Arc::new(config),
        }
    }
}
