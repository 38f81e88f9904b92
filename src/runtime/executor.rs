//! Client runtime executor

use super::{
    ChatView, ClientEvent, ClientHandle, ClientSnapshot, ClientUpdate, Command, DispatchError,
    ListingsView,
};
use crate::conversation::{self, ChatContext, ChatState};
use crate::identity::{Principal, Session};
use crate::listings::{self, ListingsContext, ListingsState};
use crate::remote::RemoteService;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc, watch};

/// Generic client runtime that can work with any remote service implementation
pub struct ClientRuntime<R>
where
    R: RemoteService + 'static,
{
    chat_context: ChatContext,
    listings_context: ListingsContext,
    chat: ChatState,
    listings: ListingsState,
    session: Session,
    remote: Arc<R>,
    command_rx: mpsc::Receiver<Command>,
    /// Weak so the loop ends once every handle and in-flight call is gone
    command_tx: mpsc::WeakSender<Command>,
    update_tx: broadcast::Sender<ClientUpdate>,
    snapshot_tx: watch::Sender<ClientSnapshot>,
}

impl<R> ClientRuntime<R>
where
    R: RemoteService + 'static,
{
    /// Build the runtime and the handle used to drive it
    pub fn new(
        chat_context: ChatContext,
        listings_context: ListingsContext,
        remote: R,
    ) -> (Self, ClientHandle) {
        let chat = ChatState::new(&chat_context);
        let listings = ListingsState::default();
        let session = Session::default();

        let (command_tx, command_rx) = mpsc::channel(64);
        let (update_tx, _) = broadcast::channel(128);
        let (snapshot_tx, snapshot_rx) = watch::channel(ClientSnapshot {
            principal: None,
            chat: ChatView::from(&chat),
            listings: ListingsView::from(&listings),
        });

        let weak_tx = command_tx.downgrade();
        let handle = ClientHandle::new(command_tx, update_tx.clone(), snapshot_rx);
        let runtime = Self {
            chat_context,
            listings_context,
            chat,
            listings,
            session,
            remote: Arc::new(remote),
            command_rx,
            command_tx: weak_tx,
            update_tx,
            snapshot_tx,
        };
        (runtime, handle)
    }

    pub async fn run(mut self) {
        tracing::info!("Starting client runtime");

        // Fetch on mount
        if let Err(e) = self.process_event(ClientEvent::Listings(listings::Event::Refresh)) {
            tracing::error!(error = %e, "Initial listing load rejected");
        }

        while let Some(command) = self.command_rx.recv().await {
            let outcome = self.process_event(command.event);
            match command.ack {
                Some(ack) => {
                    let _ = ack.send(outcome);
                }
                None => {
                    if let Err(e) = outcome {
                        // Settlements that arrive after their state moved on
                        tracing::debug!(error = %e, "Dropped settlement event");
                    }
                }
            }
        }

        tracing::info!("Client runtime stopped");
    }

    fn process_event(&mut self, event: ClientEvent) -> Result<(), DispatchError> {
        match event {
            ClientEvent::Chat(event) => {
                let result =
                    conversation::transition(&self.chat, &self.chat_context, event)?;
                self.chat = result.new_state;
                for effect in result.effects {
                    self.execute_chat_effect(effect);
                }
            }
            ClientEvent::Listings(event) => {
                let result =
                    listings::transition(&self.listings, &self.listings_context, event)?;
                self.listings = result.new_state;
                for effect in result.effects {
                    self.execute_listings_effect(effect);
                }
            }
            ClientEvent::Authenticated { principal } => self.authenticate(principal)?,
        }

        self.publish_snapshot();
        Ok(())
    }

    fn authenticate(&mut self, principal: Principal) -> Result<(), DispatchError> {
        if self.session.principal() == Some(&principal) {
            return Ok(());
        }
        if !self.session.authenticate(principal.clone()) {
            tracing::warn!(principal = %principal, "Ignoring principal for an established session");
            return Err(DispatchError::SessionMismatch);
        }
        tracing::info!(principal = %principal, "Session established");
        let _ = self.update_tx.send(ClientUpdate::Session { principal });
        Ok(())
    }

    fn execute_chat_effect(&mut self, effect: conversation::Effect) {
        match effect {
            conversation::Effect::RequestReply { turns } => {
                let remote = self.remote.clone();
                let Some(command_tx) = self.settlement_sender() else {
                    return;
                };
                tracing::info!(turns = turns.len(), "Requesting assistant reply (background)");

                tokio::spawn(async move {
                    let event = match remote.send_chat_turn(&turns).await {
                        Ok(reply) => conversation::Event::ReplyReceived { reply },
                        Err(e) => conversation::Event::ReplyFailed { message: e.message },
                    };
                    settle(&command_tx, ClientEvent::Chat(event)).await;
                });
            }

            conversation::Effect::Publish => {
                let _ = self.update_tx.send(ClientUpdate::Transcript {
                    turns: self.chat.transcript.turns().to_vec(),
                    busy: self.chat.busy(),
                });
            }
        }
    }

    fn execute_listings_effect(&mut self, effect: listings::Effect) {
        match effect {
            listings::Effect::LoadListings => {
                let remote = self.remote.clone();
                let Some(command_tx) = self.settlement_sender() else {
                    return;
                };

                tokio::spawn(async move {
                    let event = match remote.list_listings().await {
                        Ok(listings) => listings::Event::Loaded { listings },
                        Err(e) => listings::Event::LoadFailed { message: e.message },
                    };
                    settle(&command_tx, ClientEvent::Listings(event)).await;
                });
            }

            listings::Effect::CreateListing { listing } => {
                let remote = self.remote.clone();
                let Some(command_tx) = self.settlement_sender() else {
                    return;
                };
                tracing::info!(title = %listing.title, price = listing.price, "Creating listing (background)");

                tokio::spawn(async move {
                    let event = match remote.create_listing(&listing).await {
                        Ok(id) => listings::Event::Created { id },
                        Err(e) => listings::Event::CreateFailed { message: e.message },
                    };
                    settle(&command_tx, ClientEvent::Listings(event)).await;
                });
            }

            listings::Effect::ListingCreated { id } => {
                tracing::info!(id, "Listing created");
                let _ = self.update_tx.send(ClientUpdate::ListingCreated { id });
            }

            listings::Effect::Alert { message } => {
                let _ = self.update_tx.send(ClientUpdate::Alert { message });
            }

            listings::Effect::Publish => {
                let _ = self.update_tx.send(ClientUpdate::Listings {
                    listings: self.listings.listings.clone(),
                    loading: self.listings.loading(),
                });
                let _ = self.update_tx.send(ClientUpdate::Draft {
                    draft: self.listings.draft.clone(),
                    submitting: self.listings.submitting,
                });
            }
        }
    }

    /// Sender for a remote call's settlement, unless the client has shut down
    fn settlement_sender(&self) -> Option<mpsc::Sender<Command>> {
        let sender = self.command_tx.upgrade();
        if sender.is_none() {
            tracing::debug!("No client handles left, skipping remote call");
        }
        sender
    }

    fn publish_snapshot(&self) {
        self.snapshot_tx.send_replace(ClientSnapshot {
            principal: self.session.principal().cloned(),
            chat: ChatView::from(&self.chat),
            listings: ListingsView::from(&self.listings),
        });
    }
}

/// Feed a remote settlement back into the runtime queue
async fn settle(command_tx: &mpsc::Sender<Command>, event: ClientEvent) {
    // The loop keeps receiving while this sender is alive
    let _ = command_tx.send(Command { event, ack: None }).await;
}
