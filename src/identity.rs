//! Identity collaborator
//!
//! The decentralized-identity handshake is a black box here: the client only
//! needs to know whether a session exists and which principal it belongs to.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tokio::sync::RwLock;

/// Opaque identity handle of the signed-in user
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Principal(String);

impl Principal {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    #[allow(dead_code)] // For future API use
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Authentication state of the client. Set once, never cleared.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Session {
    principal: Option<Principal>,
}

impl Session {
    pub fn principal(&self) -> Option<&Principal> {
        self.principal.as_ref()
    }

    #[allow(dead_code)] // For future API use
    pub fn is_authenticated(&self) -> bool {
        self.principal.is_some()
    }

    /// Record the principal. Returns false (and keeps the first one) if the
    /// session is already bound to a different principal.
    pub fn authenticate(&mut self, principal: Principal) -> bool {
        match &self.principal {
            None => {
                self.principal = Some(principal);
                true
            }
            Some(existing) => existing == &principal,
        }
    }
}

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("Identity provider unreachable: {0}")]
    Unreachable(String),
    #[error("Login rejected by identity provider: {0}")]
    Rejected(String),
    #[error("Malformed identity provider response: {0}")]
    Malformed(String),
}

/// Options for a login handshake
#[derive(Debug, Clone)]
pub struct LoginOptions {
    pub identity_provider: String,
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    #[allow(dead_code)] // Part of the provider contract; callers use principal()
    async fn is_authenticated(&self) -> bool;

    async fn principal(&self) -> Option<Principal>;

    /// Run the login handshake; resolves with the principal on success
    async fn login(&self, options: &LoginOptions) -> Result<Principal, IdentityError>;
}

/// Identity provider reached over HTTP
pub struct HttpIdentityProvider {
    client: Client,
    current: RwLock<Option<Principal>>,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    principal: String,
}

impl HttpIdentityProvider {
    pub fn new(existing: Option<Principal>) -> Result<Self, IdentityError> {
        let client = Client::builder()
            .build()
            .map_err(|e| IdentityError::Unreachable(e.to_string()))?;
        Ok(Self {
            client,
            current: RwLock::new(existing),
        })
    }
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    async fn is_authenticated(&self) -> bool {
        self.current.read().await.is_some()
    }

    async fn principal(&self) -> Option<Principal> {
        self.current.read().await.clone()
    }

    async fn login(&self, options: &LoginOptions) -> Result<Principal, IdentityError> {
        if let Some(existing) = self.current.read().await.clone() {
            return Ok(existing);
        }

        let response = self
            .client
            .post(&options.identity_provider)
            .send()
            .await
            .map_err(|e| IdentityError::Unreachable(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| IdentityError::Unreachable(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            return Err(IdentityError::Rejected(format!("HTTP {status}: {body}")));
        }

        let parsed: LoginResponse =
            serde_json::from_str(&body).map_err(|e| IdentityError::Malformed(e.to_string()))?;
        if parsed.principal.trim().is_empty() {
            return Err(IdentityError::Malformed("empty principal".to_string()));
        }

        let principal = Principal::new(parsed.principal);
        *self.current.write().await = Some(principal.clone());
        tracing::info!(principal = %principal, "Login completed");
        Ok(principal)
    }
}
