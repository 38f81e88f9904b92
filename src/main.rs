//! Travelchain - tourism client with an assistant and a tour marketplace
//!
//! Hosts the client-side controllers for the assistant chat and the tour
//! listings, talking to the tourism backend and the identity provider.

mod api;
mod config;
mod conversation;
mod identity;
mod listings;
mod remote;
mod runtime;

use api::{create_router, AppState};
use config::ClientConfig;
use conversation::ChatContext;
use identity::{HttpIdentityProvider, IdentityProvider};
use listings::ListingsContext;
use remote::{HttpRemoteService, LoggingRemote};
use runtime::{ClientEvent, ClientRuntime};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "travelchain=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    // Configuration
    let config = ClientConfig::from_env()?;
    tracing::info!(
        backend = %config.backend_url,
        locale = ?config.locale,
        categories = config.categories.as_slice().len(),
        "Configuration loaded"
    );

    // Collaborators
    let remote = LoggingRemote::new(HttpRemoteService::new(&config.backend_url)?);
    let identity: Arc<dyn IdentityProvider> =
        Arc::new(HttpIdentityProvider::new(config.session_principal.clone())?);

    // Client runtime; its first act is the initial listing load
    let chat_context = ChatContext::new(config.locale.chat_copy());
    let listings_context =
        ListingsContext::new(config.categories.clone(), config.locale.listing_copy());
    let (runtime, client) = ClientRuntime::new(chat_context, listings_context.clone(), remote);
    tokio::spawn(runtime.run());

    if let Some(principal) = identity.principal().await {
        tracing::info!(principal = %principal, "Resuming existing session");
        client
            .dispatch(ClientEvent::Authenticated { principal })
            .await?;
    }

    // Create router
    let port = config.port;
    let state = AppState::new(client, identity, listings_context, config);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = create_router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Travelchain client listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
