//! HTTP request handlers

use super::sse::sse_stream;
use super::types::{
    AcceptedResponse, CategoriesResponse, CategoryToggleRequest, ChatRequest,
    CreateListingRequest, DraftPatch, DraftResponse, ErrorResponse, ListingEntry,
    ListingsResponse, NoticeResponse, SessionResponse,
};
use super::AppState;
use crate::conversation;
use crate::identity::LoginOptions;
use crate::listings::{self, ListingsContext};
use crate::remote::ListingId;
use crate::runtime::{ClientEvent, ClientSnapshot, DispatchError};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch, post, put},
    Json, Router,
};

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Full state and live updates
        .route("/api/state", get(get_state))
        .route("/api/stream", get(stream_updates))
        // Identity
        .route("/api/session", get(get_session))
        .route("/api/login", post(login))
        // Assistant panel
        .route("/api/chat", post(submit_chat))
        .route("/api/chat/input", put(update_chat_input))
        .route("/api/chat/clear", post(clear_chat))
        // Listings
        .route("/api/listings", get(list_listings).post(create_listing))
        .route("/api/listings/refresh", post(refresh_listings))
        .route("/api/listings/:id/reserve", post(reserve_listing))
        .route("/api/listings/:id/review", post(review_listing))
        // Create form
        .route("/api/draft", patch(edit_draft))
        .route("/api/draft/categories", post(toggle_category))
        .route("/api/categories", get(list_categories))
        // Version
        .route("/version", get(get_version))
        .with_state(state)
}

// ============================================================
// State & Streaming
// ============================================================

async fn get_state(State(state): State<AppState>) -> Json<ClientSnapshot> {
    Json(state.client.snapshot())
}

async fn stream_updates(State(state): State<AppState>) -> impl IntoResponse {
    // Subscribe first so nothing lands between snapshot and stream
    let updates = state.client.subscribe();
    sse_stream(state.client.snapshot(), updates)
}

// ============================================================
// Identity
// ============================================================

async fn get_session(State(state): State<AppState>) -> Json<SessionResponse> {
    Json(SessionResponse::new(state.client.snapshot().principal))
}

async fn login(State(state): State<AppState>) -> Result<Json<SessionResponse>, AppError> {
    let options = LoginOptions {
        identity_provider: state.config.identity_provider.clone(),
    };
    let principal = state.identity.login(&options).await.map_err(|e| {
        tracing::warn!(error = %e, "Login failed");
        AppError::Upstream(e.to_string())
    })?;

    state
        .client
        .dispatch(ClientEvent::Authenticated {
            principal: principal.clone(),
        })
        .await
        .map_err(|e| AppError::from_dispatch(e, &state.listings))?;

    Ok(Json(SessionResponse::new(Some(principal))))
}

// ============================================================
// Assistant Panel
// ============================================================

async fn submit_chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<AcceptedResponse>, AppError> {
    match state.client.chat(conversation::Event::submit(req.text)).await {
        Ok(()) => Ok(Json(AcceptedResponse { accepted: true })),
        // Blank text or a reply still outstanding: nothing happens
        Err(DispatchError::Chat(e)) => {
            tracing::debug!(error = %e, "Chat submission ignored");
            Ok(Json(AcceptedResponse { accepted: false }))
        }
        Err(e) => Err(AppError::from_dispatch(e, &state.listings)),
    }
}

async fn update_chat_input(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<StatusCode, AppError> {
    state
        .client
        .chat(conversation::Event::InputChanged { text: req.text })
        .await
        .map_err(|e| AppError::from_dispatch(e, &state.listings))?;
    Ok(StatusCode::NO_CONTENT)
}

async fn clear_chat(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    state
        .client
        .chat(conversation::Event::Clear)
        .await
        .map_err(|e| AppError::from_dispatch(e, &state.listings))?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================
// Listings
// ============================================================

async fn list_listings(State(state): State<AppState>) -> Json<ListingsResponse> {
    let snapshot = state.client.snapshot();
    let principal = snapshot.principal.as_ref();
    let listings = snapshot
        .listings
        .listings
        .into_iter()
        .map(|listing| ListingEntry::new(listing, principal))
        .collect();

    Json(ListingsResponse {
        listings,
        loading: snapshot.listings.loading,
    })
}

async fn refresh_listings(State(state): State<AppState>) -> Result<Response, AppError> {
    state
        .client
        .listings(listings::Event::Refresh)
        .await
        .map_err(|e| AppError::from_dispatch(e, &state.listings))?;
    Ok((StatusCode::ACCEPTED, Json(AcceptedResponse { accepted: true })).into_response())
}

async fn create_listing(
    State(state): State<AppState>,
    Json(req): Json<CreateListingRequest>,
) -> Result<Response, AppError> {
    let draft = req
        .draft
        .unwrap_or_else(|| state.client.snapshot().listings.draft);

    state
        .client
        .listings(listings::Event::Create { draft })
        .await
        .map_err(|e| AppError::from_dispatch(e, &state.listings))?;

    Ok((StatusCode::ACCEPTED, Json(AcceptedResponse { accepted: true })).into_response())
}

async fn reserve_listing(
    State(state): State<AppState>,
    Path(id): Path<ListingId>,
) -> Json<NoticeResponse> {
    tracing::info!(id, "Reservation requested");
    Json(NoticeResponse {
        message: state.listings.copy.reservation_notice(id),
    })
}

async fn review_listing(
    State(state): State<AppState>,
    Path(id): Path<ListingId>,
) -> Json<NoticeResponse> {
    tracing::info!(id, "Review requested");
    Json(NoticeResponse {
        message: state.listings.copy.review_notice(id),
    })
}

// ============================================================
// Create Form
// ============================================================

async fn edit_draft(
    State(state): State<AppState>,
    Json(patch): Json<DraftPatch>,
) -> Result<Json<DraftResponse>, AppError> {
    for (field, value) in patch.into_edits() {
        state
            .client
            .listings(listings::Event::EditDraft { field, value })
            .await
            .map_err(|e| AppError::from_dispatch(e, &state.listings))?;
    }
    Ok(Json(draft_response(&state.client.snapshot())))
}

async fn toggle_category(
    State(state): State<AppState>,
    Json(req): Json<CategoryToggleRequest>,
) -> Result<Json<DraftResponse>, AppError> {
    state
        .client
        .listings(listings::Event::ToggleCategory {
            category: req.category,
            selected: req.selected,
        })
        .await
        .map_err(|e| AppError::from_dispatch(e, &state.listings))?;
    Ok(Json(draft_response(&state.client.snapshot())))
}

async fn list_categories(State(state): State<AppState>) -> Json<CategoriesResponse> {
    Json(CategoriesResponse {
        categories: state.listings.options.clone(),
    })
}

fn draft_response(snapshot: &ClientSnapshot) -> DraftResponse {
    DraftResponse {
        draft: snapshot.listings.draft.clone(),
        submitting: snapshot.listings.submitting,
    }
}

// ============================================================
// Version
// ============================================================

async fn get_version() -> &'static str {
    concat!("travelchain ", env!("CARGO_PKG_VERSION"))
}

// ============================================================
// Error Handling
// ============================================================

#[derive(Debug)]
enum AppError {
    BadRequest(String),
    /// Form input the user has to fix; carries localized text
    Unprocessable(String),
    Conflict(String),
    /// Identity provider or backend failed
    Upstream(String),
    Internal(String),
}

impl AppError {
    fn from_dispatch(err: DispatchError, context: &ListingsContext) -> Self {
        match err {
            DispatchError::Listings(listings::TransitionError::Validation(v)) => {
                AppError::Unprocessable(v.user_message(context).to_string())
            }
            DispatchError::Listings(e @ listings::TransitionError::UnknownCategory(_)) => {
                AppError::BadRequest(e.to_string())
            }
            DispatchError::Chat(e @ conversation::TransitionError::EmptyInput) => {
                AppError::BadRequest(e.to_string())
            }
            e @ (DispatchError::Chat(_) | DispatchError::Listings(_) | DispatchError::SessionMismatch) => {
                AppError::Conflict(e.to_string())
            }
            e @ DispatchError::Closed => AppError::Internal(e.to_string()),
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            AppError::BadRequest(msg)
            | AppError::Unprocessable(msg)
            | AppError::Conflict(msg)
            | AppError::Upstream(msg)
            | AppError::Internal(msg) => msg,
        };

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}
