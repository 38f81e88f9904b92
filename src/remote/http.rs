//! HTTP adapter for the remote service

use super::types::{ChatTurn, Listing, ListingId, NewListing};
use super::{RemoteError, RemoteService};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Remote service reached over JSON/HTTP
pub struct HttpRemoteService {
    client: Client,
    base_url: String,
}

impl HttpRemoteService {
    /// No request timeout is configured: a hung call keeps its component busy.
    pub fn new(base_url: &str) -> Result<Self, RemoteError> {
        let client = Client::builder()
            .build()
            .map_err(|e| RemoteError::unknown(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    async fn read<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, RemoteError> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| RemoteError::network(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            return Err(classify_error(status, &body));
        }

        serde_json::from_str(&body)
            .map_err(|e| RemoteError::decode(format!("Failed to parse response: {e} - body: {body}")))
    }
}

fn send_error(e: &reqwest::Error) -> RemoteError {
    if e.is_connect() {
        RemoteError::network(format!("Connection failed: {e}"))
    } else if e.is_timeout() {
        RemoteError::network(format!("Request timeout: {e}"))
    } else {
        RemoteError::unknown(format!("Request failed: {e}"))
    }
}

fn classify_error(status: StatusCode, body: &str) -> RemoteError {
    match status.as_u16() {
        400..=499 => RemoteError::rejected(format!("HTTP {status}: {body}")),
        500..=599 => RemoteError::server(format!("Server error: {body}")),
        _ => RemoteError::unknown(format!("HTTP {status}: {body}")),
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    messages: &'a [ChatTurn],
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    reply: String,
}

#[derive(Debug, Deserialize)]
struct CreatedListing {
    id: ListingId,
}

#[async_trait]
impl RemoteService for HttpRemoteService {
    async fn send_chat_turn(&self, turns: &[ChatTurn]) -> Result<String, RemoteError> {
        let response = self
            .client
            .post(self.url("chat"))
            .json(&ChatRequest { messages: turns })
            .send()
            .await
            .map_err(|e| send_error(&e))?;
        let reply: ChatReply = Self::read(response).await?;
        Ok(reply.reply)
    }

    async fn list_listings(&self) -> Result<Vec<Listing>, RemoteError> {
        let response = self
            .client
            .get(self.url("tours"))
            .send()
            .await
            .map_err(|e| send_error(&e))?;
        Self::read(response).await
    }

    async fn create_listing(&self, listing: &NewListing) -> Result<ListingId, RemoteError> {
        let response = self
            .client
            .post(self.url("tours"))
            .json(listing)
            .send()
            .await
            .map_err(|e| send_error(&e))?;
        let created: CreatedListing = Self::read(response).await?;
        Ok(created.id)
    }
}
