//! API request and response types

use crate::config::CategoryOptions;
use crate::identity::Principal;
use crate::listings::{DraftField, DraftListing};
use crate::remote::Listing;
use serde::{Deserialize, Serialize};

/// Request carrying chat text, for both input edits and submission
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub text: String,
}

/// Whether the runtime took the action
#[derive(Debug, Serialize)]
pub struct AcceptedResponse {
    pub accepted: bool,
}

/// Partial edit of the create form; absent fields are left alone
#[derive(Debug, Default, Deserialize)]
pub struct DraftPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<String>,
}

impl DraftPatch {
    /// One edit per provided field, in form order
    pub fn into_edits(self) -> Vec<(DraftField, String)> {
        [
            (DraftField::Title, self.title),
            (DraftField::Description, self.description),
            (DraftField::Price, self.price),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.map(|v| (field, v)))
        .collect()
    }
}

/// Request to select or deselect a category on the draft
#[derive(Debug, Deserialize)]
pub struct CategoryToggleRequest {
    pub category: String,
    #[serde(default = "selected_by_default")]
    pub selected: bool,
}

fn selected_by_default() -> bool {
    true
}

/// Request to create a listing. Without a draft the current form is used.
#[derive(Debug, Default, Deserialize)]
pub struct CreateListingRequest {
    #[serde(default)]
    pub draft: Option<DraftListing>,
}

/// Listing as shown to the signed-in user
#[derive(Debug, Serialize)]
pub struct ListingEntry {
    #[serde(flatten)]
    pub listing: Listing,
    /// Created by the current principal
    pub own: bool,
}

impl ListingEntry {
    pub fn new(listing: Listing, principal: Option<&Principal>) -> Self {
        let own = principal.is_some_and(|p| listing.is_owned_by(p));
        Self { listing, own }
    }
}

/// Response with the listing collection
#[derive(Debug, Serialize)]
pub struct ListingsResponse {
    pub listings: Vec<ListingEntry>,
    pub loading: bool,
}

#[derive(Debug, Serialize)]
pub struct DraftResponse {
    pub draft: DraftListing,
    pub submitting: bool,
}

/// Response for session queries and login
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub principal: Option<Principal>,
}

impl SessionResponse {
    pub fn new(principal: Option<Principal>) -> Self {
        Self {
            authenticated: principal.is_some(),
            principal,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CategoriesResponse {
    pub categories: CategoryOptions,
}

/// Informational notice for features that are not built yet
#[derive(Debug, Serialize)]
pub struct NoticeResponse {
    pub message: String,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
