//! Client runtime
//!
//! Owns the chat and listing state machines on a single task. Events are
//! processed one at a time; remote calls run as background tasks and report
//! back as settlement events through the same queue.

mod executor;

#[cfg(test)]
pub mod testing;

pub use executor::ClientRuntime;

use crate::conversation::{self, ChatState, Turn};
use crate::identity::Principal;
use crate::listings::{self, DraftListing, ListingsState};
use crate::remote::{Listing, ListingId};
use serde::Serialize;
use thiserror::Error;
use tokio::sync::{broadcast, mpsc, oneshot, watch};

/// Anything the runtime reacts to
#[derive(Debug, Clone)]
pub enum ClientEvent {
    Chat(conversation::Event),
    Listings(listings::Event),
    Authenticated { principal: Principal },
}

/// Why a dispatched event was not applied
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error(transparent)]
    Chat(#[from] conversation::TransitionError),
    #[error(transparent)]
    Listings(#[from] listings::TransitionError),
    #[error("Session already belongs to another principal")]
    SessionMismatch,
    #[error("Client runtime is not running")]
    Closed,
}

pub(crate) struct Command {
    pub event: ClientEvent,
    pub ack: Option<oneshot::Sender<Result<(), DispatchError>>>,
}

/// Incremental updates pushed to observers
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientUpdate {
    Transcript { turns: Vec<Turn>, busy: bool },
    Listings { listings: Vec<Listing>, loading: bool },
    Draft { draft: DraftListing, submitting: bool },
    Session { principal: Principal },
    Alert { message: String },
    ListingCreated { id: ListingId },
}

/// Read-only view of the chat panel
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatView {
    pub turns: Vec<Turn>,
    pub pending_input: String,
    pub busy: bool,
}

impl From<&ChatState> for ChatView {
    fn from(state: &ChatState) -> Self {
        Self {
            turns: state.transcript.turns().to_vec(),
            pending_input: state.pending_input.clone(),
            busy: state.busy(),
        }
    }
}

/// Read-only view of the listing collection and form
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListingsView {
    pub listings: Vec<Listing>,
    pub loading: bool,
    pub draft: DraftListing,
    pub submitting: bool,
}

impl From<&ListingsState> for ListingsView {
    fn from(state: &ListingsState) -> Self {
        Self {
            listings: state.listings.clone(),
            loading: state.loading(),
            draft: state.draft.clone(),
            submitting: state.submitting,
        }
    }
}

/// Everything a UI needs to render from scratch
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClientSnapshot {
    pub principal: Option<Principal>,
    pub chat: ChatView,
    pub listings: ListingsView,
}

/// Cloneable handle to a running client runtime
#[derive(Clone)]
pub struct ClientHandle {
    command_tx: mpsc::Sender<Command>,
    update_tx: broadcast::Sender<ClientUpdate>,
    snapshot_rx: watch::Receiver<ClientSnapshot>,
}

impl ClientHandle {
    pub(crate) fn new(
        command_tx: mpsc::Sender<Command>,
        update_tx: broadcast::Sender<ClientUpdate>,
        snapshot_rx: watch::Receiver<ClientSnapshot>,
    ) -> Self {
        Self {
            command_tx,
            update_tx,
            snapshot_rx,
        }
    }

    /// Apply an event and wait until the runtime has accepted or rejected it.
    /// Remote calls it triggers are still running when this returns.
    pub async fn dispatch(&self, event: ClientEvent) -> Result<(), DispatchError> {
        let (ack_tx, ack_rx) = oneshot::channel();
        self.command_tx
            .send(Command {
                event,
                ack: Some(ack_tx),
            })
            .await
            .map_err(|_| DispatchError::Closed)?;
        ack_rx.await.map_err(|_| DispatchError::Closed)?
    }

    pub async fn chat(&self, event: conversation::Event) -> Result<(), DispatchError> {
        self.dispatch(ClientEvent::Chat(event)).await
    }

    pub async fn listings(&self, event: listings::Event) -> Result<(), DispatchError> {
        self.dispatch(ClientEvent::Listings(event)).await
    }

    pub fn snapshot(&self) -> ClientSnapshot {
        self.snapshot_rx.borrow().clone()
    }

    #[allow(dead_code)] // Used by tests to await state changes
    pub fn watch(&self) -> watch::Receiver<ClientSnapshot> {
        self.snapshot_rx.clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ClientUpdate> {
        self.update_tx.subscribe()
    }
}
