//! Mock remote service and runtime harness
//!
//! Drives the real runtime loop against queued remote results, no network.

use super::{ClientHandle, ClientRuntime, ClientSnapshot};
use crate::config::Locale;
use crate::conversation::ChatContext;
use crate::listings::ListingsContext;
use crate::remote::{ChatTurn, Listing, ListingId, NewListing, RemoteError, RemoteService};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

// ============================================================================
// Mock Remote Service
// ============================================================================

/// Remote service that answers from per-operation queues
#[allow(dead_code)]
#[derive(Default)]
pub struct MockRemoteService {
    chat_results: Mutex<VecDeque<Result<String, RemoteError>>>,
    list_results: Mutex<VecDeque<Result<Vec<Listing>, RemoteError>>>,
    create_results: Mutex<VecDeque<Result<ListingId, RemoteError>>>,
    delay: Option<Duration>,
    /// Transcripts sent to the assistant
    pub chat_requests: Mutex<Vec<Vec<ChatTurn>>>,
    pub list_calls: Mutex<usize>,
    pub create_requests: Mutex<Vec<NewListing>>,
}

#[allow(dead_code)]
impl MockRemoteService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hold every response back, to observe in-flight states
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn queue_reply(&self, reply: impl Into<String>) {
        self.chat_results.lock().unwrap().push_back(Ok(reply.into()));
    }

    pub fn queue_chat_error(&self, error: RemoteError) {
        self.chat_results.lock().unwrap().push_back(Err(error));
    }

    pub fn queue_listings(&self, listings: Vec<Listing>) {
        self.list_results.lock().unwrap().push_back(Ok(listings));
    }

    pub fn queue_list_error(&self, error: RemoteError) {
        self.list_results.lock().unwrap().push_back(Err(error));
    }

    pub fn queue_created(&self, id: ListingId) {
        self.create_results.lock().unwrap().push_back(Ok(id));
    }

    pub fn queue_create_error(&self, error: RemoteError) {
        self.create_results.lock().unwrap().push_back(Err(error));
    }

    pub fn recorded_chat_requests(&self) -> Vec<Vec<ChatTurn>> {
        self.chat_requests.lock().unwrap().clone()
    }

    pub fn recorded_list_calls(&self) -> usize {
        *self.list_calls.lock().unwrap()
    }

    pub fn recorded_create_requests(&self) -> Vec<NewListing> {
        self.create_requests.lock().unwrap().clone()
    }

    async fn pause(&self) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }
}

fn nothing_queued<T>() -> Result<T, RemoteError> {
    Err(RemoteError::network("No mock response queued"))
}

#[async_trait]
impl RemoteService for MockRemoteService {
    async fn send_chat_turn(&self, turns: &[ChatTurn]) -> Result<String, RemoteError> {
        self.chat_requests.lock().unwrap().push(turns.to_vec());
        self.pause().await;
        self.chat_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(nothing_queued)
    }

    async fn list_listings(&self) -> Result<Vec<Listing>, RemoteError> {
        *self.list_calls.lock().unwrap() += 1;
        self.pause().await;
        self.list_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(nothing_queued)
    }

    async fn create_listing(&self, listing: &NewListing) -> Result<ListingId, RemoteError> {
        self.create_requests.lock().unwrap().push(listing.clone());
        self.pause().await;
        self.create_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(nothing_queued)
    }
}

// ============================================================================
// Test Runtime Builder
// ============================================================================

/// Builder for a runtime running on the test's tokio runtime
#[allow(dead_code)]
pub struct TestRuntime {
    remote: Option<MockRemoteService>,
    locale: Locale,
}

#[allow(dead_code)]
impl TestRuntime {
    pub fn new() -> Self {
        Self {
            remote: None,
            locale: Locale::English,
        }
    }

    pub fn remote(mut self, remote: MockRemoteService) -> Self {
        self.remote = Some(remote);
        self
    }

    pub fn locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    pub fn build(self) -> RunningClient {
        let remote = Arc::new(self.remote.unwrap_or_default());
        let (runtime, handle) = ClientRuntime::new(
            ChatContext::new(self.locale.chat_copy()),
            ListingsContext::new(self.locale.default_categories(), self.locale.listing_copy()),
            remote.clone(),
        );
        tokio::spawn(runtime.run());
        RunningClient { handle, remote }
    }
}

/// A spawned runtime plus access to its mock
#[allow(dead_code)]
pub struct RunningClient {
    pub handle: ClientHandle,
    pub remote: Arc<MockRemoteService>,
}

#[allow(dead_code)]
impl RunningClient {
    /// Wait for a snapshot satisfying `condition`; false on timeout
    pub async fn wait_until(
        &self,
        condition: impl FnMut(&ClientSnapshot) -> bool,
        timeout: Duration,
    ) -> bool {
        let mut rx = self.handle.watch();
        let reached = matches!(
            tokio::time::timeout(timeout, rx.wait_for(condition)).await,
            Ok(Ok(_))
        );
        reached
    }

    /// Wait for the listing load started on mount to settle
    pub async fn wait_for_idle_listings(&self) -> bool {
        self.wait_until(|s| !s.listings.loading, Duration::from_secs(2))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::{self, Turn};
    use crate::identity::Principal;
    use crate::listings::{self, CategorySet, DraftListing, TransitionError, ValidationError};
    use crate::remote::Speaker;
    use crate::runtime::{ClientEvent, ClientUpdate, DispatchError};

    fn listing(id: ListingId, title: &str) -> Listing {
        Listing {
            id,
            title: title.to_string(),
            description: "A walk".to_string(),
            price: 40,
            categories: vec!["Museums".to_string()],
            creator: Principal::new("2vxsx-fae"),
            available: true,
        }
    }

    fn city_tour() -> DraftListing {
        DraftListing {
            title: "City Tour".to_string(),
            description: "Walk".to_string(),
            price: "50".to_string(),
            categories: CategorySet::from(vec!["Museums".to_string()]),
        }
    }

    #[tokio::test]
    async fn test_mock_remote_service() {
        let mock = MockRemoteService::new();
        mock.queue_reply("Hello");

        let reply = mock.send_chat_turn(&[ChatTurn::user("Hi")]).await.unwrap();
        assert_eq!(reply, "Hello");

        // Second call should fail (no more responses)
        assert!(mock.send_chat_turn(&[]).await.is_err());
        assert_eq!(mock.recorded_chat_requests().len(), 2);
    }

    #[tokio::test]
    async fn test_listings_loaded_on_mount() {
        let remote = MockRemoteService::new();
        remote.queue_listings(vec![listing(1, "Lima by night"), listing(2, "Cusco")]);

        let client = TestRuntime::new().remote(remote).build();
        assert!(
            client
                .wait_until(|s| s.listings.listings.len() == 2, Duration::from_secs(2))
                .await
        );
        assert_eq!(client.remote.recorded_list_calls(), 1);
        assert!(!client.handle.snapshot().listings.loading);
    }

    #[tokio::test]
    async fn test_chat_reply_replaces_placeholder() {
        let remote = MockRemoteService::new();
        remote.queue_reply("Try the Larco museum");

        let client = TestRuntime::new().remote(remote).build();
        client
            .handle
            .chat(conversation::Event::submit("Best museums in Lima?"))
            .await
            .unwrap();

        assert!(
            client
                .wait_until(|s| !s.chat.busy, Duration::from_secs(2))
                .await
        );

        let turns = client.handle.snapshot().chat.turns;
        assert_eq!(turns.len(), 3);
        assert_eq!(
            turns[2],
            Turn::System {
                text: "Try the Larco museum".to_string()
            }
        );
        assert!(!turns.iter().any(Turn::is_pending));

        let requests = client.remote.recorded_chat_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0], vec![ChatTurn::user("Best museums in Lima?")]);
    }

    #[tokio::test]
    async fn test_chat_failure_shows_apology() {
        let remote = MockRemoteService::new();
        remote.queue_chat_error(RemoteError::server("boom"));

        let client = TestRuntime::new().remote(remote).build();
        client
            .handle
            .chat(conversation::Event::submit("Hi"))
            .await
            .unwrap();

        assert!(
            client
                .wait_until(|s| !s.chat.busy, Duration::from_secs(2))
                .await
        );

        let turns = client.handle.snapshot().chat.turns;
        let last = turns.last().unwrap();
        assert_eq!(last.speaker(), Speaker::System);
        assert_eq!(last.text(), Locale::English.chat_copy().failure);
        assert!(!turns.iter().any(Turn::is_pending));
    }

    #[tokio::test]
    async fn test_second_submit_while_busy_is_rejected() {
        let remote = MockRemoteService::new().with_delay(Duration::from_millis(200));
        remote.queue_reply("first");

        let client = TestRuntime::new().remote(remote).build();
        client
            .handle
            .chat(conversation::Event::submit("one"))
            .await
            .unwrap();

        let second = client.handle.chat(conversation::Event::submit("two")).await;
        assert_eq!(
            second,
            Err(DispatchError::Chat(conversation::TransitionError::Busy))
        );

        assert!(
            client
                .wait_until(|s| !s.chat.busy, Duration::from_secs(2))
                .await
        );
        assert_eq!(client.remote.recorded_chat_requests().len(), 1);
        // Greeting, "one", reply
        assert_eq!(client.handle.snapshot().chat.turns.len(), 3);
    }

    #[tokio::test]
    async fn test_create_then_reload() {
        let remote = MockRemoteService::new();
        remote.queue_listings(vec![]);
        remote.queue_created(7);
        remote.queue_listings(vec![listing(7, "City Tour")]);

        let client = TestRuntime::new().remote(remote).build();
        assert!(client.wait_for_idle_listings().await);

        let mut updates = client.handle.subscribe();
        client
            .handle
            .listings(listings::Event::Create { draft: city_tour() })
            .await
            .unwrap();

        assert!(
            client
                .wait_until(
                    |s| s.listings.listings.len() == 1
                        && !s.listings.submitting
                        && !s.listings.loading,
                    Duration::from_secs(2),
                )
                .await
        );

        let created = client.remote.recorded_create_requests();
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].price, 50);
        assert_eq!(created[0].categories, vec!["Museums".to_string()]);
        assert_eq!(client.remote.recorded_list_calls(), 2);
        assert!(client.handle.snapshot().listings.draft.is_empty());

        let mut saw_created = false;
        while let Ok(update) = updates.try_recv() {
            if update == (ClientUpdate::ListingCreated { id: 7 }) {
                saw_created = true;
            }
        }
        assert!(saw_created);
    }

    #[tokio::test]
    async fn test_invalid_price_never_reaches_backend() {
        let remote = MockRemoteService::new();
        remote.queue_listings(vec![]);

        let client = TestRuntime::new().remote(remote).build();
        assert!(client.wait_for_idle_listings().await);

        let draft = DraftListing {
            price: "abc".to_string(),
            ..city_tour()
        };
        let result = client
            .handle
            .listings(listings::Event::Create { draft })
            .await;

        assert_eq!(
            result,
            Err(DispatchError::Listings(TransitionError::Validation(
                ValidationError::InvalidPrice
            )))
        );
        assert!(client.remote.recorded_create_requests().is_empty());
        assert!(!client.handle.snapshot().listings.submitting);
    }

    #[tokio::test]
    async fn test_create_failure_alerts_and_keeps_draft() {
        let remote = MockRemoteService::new();
        remote.queue_listings(vec![]);
        remote.queue_create_error(RemoteError::rejected("not allowed"));

        let client = TestRuntime::new().remote(remote).build();
        assert!(client.wait_for_idle_listings().await);

        let mut updates = client.handle.subscribe();
        client
            .handle
            .listings(listings::Event::Create { draft: city_tour() })
            .await
            .unwrap();

        assert!(
            client
                .wait_until(|s| !s.listings.submitting, Duration::from_secs(2))
                .await
        );
        assert_eq!(client.handle.snapshot().listings.draft, city_tour());
        assert_eq!(client.remote.recorded_list_calls(), 1);

        let mut alerts = vec![];
        while let Ok(update) = updates.try_recv() {
            if let ClientUpdate::Alert { message } = update {
                alerts.push(message);
            }
        }
        assert_eq!(alerts, vec![Locale::English.listing_copy().create_failed]);
    }

    #[tokio::test]
    async fn test_refresh_failure_keeps_listings() {
        let remote = MockRemoteService::new();
        remote.queue_listings(vec![listing(1, "Cusco")]);
        remote.queue_list_error(RemoteError::network("connection refused"));

        let client = TestRuntime::new().remote(remote).build();
        assert!(
            client
                .wait_until(|s| s.listings.listings.len() == 1, Duration::from_secs(2))
                .await
        );

        client
            .handle
            .listings(listings::Event::Refresh)
            .await
            .unwrap();
        assert!(client.wait_for_idle_listings().await);

        assert_eq!(client.remote.recorded_list_calls(), 2);
        assert_eq!(
            client.handle.snapshot().listings.listings,
            vec![listing(1, "Cusco")]
        );
    }

    #[tokio::test]
    async fn test_refreshes_during_load_coalesce() {
        let remote = MockRemoteService::new().with_delay(Duration::from_millis(100));
        remote.queue_listings(vec![]);
        remote.queue_listings(vec![listing(3, "Arequipa")]);

        let client = TestRuntime::new().remote(remote).build();
        client
            .handle
            .listings(listings::Event::Refresh)
            .await
            .unwrap();
        client
            .handle
            .listings(listings::Event::Refresh)
            .await
            .unwrap();

        assert!(
            client
                .wait_until(
                    |s| !s.listings.loading && s.listings.listings.len() == 1,
                    Duration::from_secs(2),
                )
                .await
        );
        assert_eq!(client.remote.recorded_list_calls(), 2);
    }

    #[tokio::test]
    async fn test_session_is_set_once() {
        let client = TestRuntime::new().build();

        let first = Principal::new("2vxsx-fae");
        client
            .handle
            .dispatch(ClientEvent::Authenticated {
                principal: first.clone(),
            })
            .await
            .unwrap();
        // Same principal again is a no-op
        client
            .handle
            .dispatch(ClientEvent::Authenticated {
                principal: first.clone(),
            })
            .await
            .unwrap();

        let other = client
            .handle
            .dispatch(ClientEvent::Authenticated {
                principal: Principal::new("aaaaa-aa"),
            })
            .await;
        assert_eq!(other, Err(DispatchError::SessionMismatch));
        assert_eq!(client.handle.snapshot().principal, Some(first));
    }

    #[tokio::test]
    async fn test_runtime_stops_when_handles_dropped() {
        let remote = MockRemoteService::new();
        remote.queue_listings(vec![]);

        let (runtime, handle) = ClientRuntime::new(
            ChatContext::new(Locale::English.chat_copy()),
            ListingsContext::new(
                Locale::English.default_categories(),
                Locale::English.listing_copy(),
            ),
            remote,
        );
        let task = tokio::spawn(runtime.run());

        let mut rx = handle.watch();
        let loaded = tokio::time::timeout(
            Duration::from_secs(2),
            rx.wait_for(|s| !s.listings.loading),
        )
        .await;
        assert!(matches!(loaded, Ok(Ok(_))));
        drop(loaded);
        drop(rx);
        drop(handle);

        let finished = tokio::time::timeout(Duration::from_secs(2), task).await;
        assert!(finished.is_ok(), "runtime should exit once no sender is left");
    }

    #[tokio::test]
    async fn test_spanish_locale_greeting() {
        let client = TestRuntime::new().locale(Locale::Spanish).build();
        let turns = client.handle.snapshot().chat.turns;
        assert_eq!(turns.len(), 1);
        assert_eq!(turns[0].text(), Locale::Spanish.chat_copy().greeting);
    }
}
