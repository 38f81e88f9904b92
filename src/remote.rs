//! Remote service abstraction
//!
//! The backend that answers chat turns and stores tour listings. Its wire
//! format is owned by the backend; this module only consumes it.

mod error;
mod http;
mod types;

#[allow(unused_imports)] // Public API re-exports
pub use error::{RemoteError, RemoteErrorKind};
pub use http::HttpRemoteService;
pub use types::*;

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Instant;

/// Operations the client needs from the backend
#[async_trait]
pub trait RemoteService: Send + Sync {
    /// Ask the assistant for a reply to the given transcript
    async fn send_chat_turn(&self, turns: &[ChatTurn]) -> Result<String, RemoteError>;

    /// Fetch every listing in server order
    async fn list_listings(&self) -> Result<Vec<Listing>, RemoteError>;

    /// Store a new listing and return its server-assigned id
    async fn create_listing(&self, listing: &NewListing) -> Result<ListingId, RemoteError>;
}

#[async_trait]
impl<T: RemoteService + ?Sized> RemoteService for Arc<T> {
    async fn send_chat_turn(&self, turns: &[ChatTurn]) -> Result<String, RemoteError> {
        (**self).send_chat_turn(turns).await
    }

    async fn list_listings(&self) -> Result<Vec<Listing>, RemoteError> {
        (**self).list_listings().await
    }

    async fn create_listing(&self, listing: &NewListing) -> Result<ListingId, RemoteError> {
        (**self).create_listing(listing).await
    }
}

/// Logging wrapper for remote services
pub struct LoggingRemote<R> {
    inner: R,
}

impl<R: RemoteService> LoggingRemote<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }
}

fn log_outcome<T>(operation: &str, started: Instant, result: &Result<T, RemoteError>) {
    let duration_ms = started.elapsed().as_millis();
    match result {
        Ok(_) => {
            tracing::info!(operation, duration_ms = %duration_ms, "Remote call completed");
        }
        Err(e) => {
            tracing::error!(
                operation,
                duration_ms = %duration_ms,
                kind = e.kind.as_str(),
                error = %e.message,
                "Remote call failed"
            );
        }
    }
}

#[async_trait]
impl<R: RemoteService> RemoteService for LoggingRemote<R> {
    async fn send_chat_turn(&self, turns: &[ChatTurn]) -> Result<String, RemoteError> {
        let started = Instant::now();
        let result = self.inner.send_chat_turn(turns).await;
        log_outcome("send_chat_turn", started, &result);
        result
    }

    async fn list_listings(&self) -> Result<Vec<Listing>, RemoteError> {
        let started = Instant::now();
        let result = self.inner.list_listings().await;
        if let Ok(listings) = &result {
            tracing::debug!(count = listings.len(), "Listings fetched");
        }
        log_outcome("list_listings", started, &result);
        result
    }

    async fn create_listing(&self, listing: &NewListing) -> Result<ListingId, RemoteError> {
        let started = Instant::now();
        let result = self.inner.create_listing(listing).await;
        log_outcome("create_listing", started, &result);
        result
    }
}
