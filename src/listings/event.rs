//! Events that can occur around the listing collection and create form

use super::state::DraftListing;
use crate::remote::{Listing, ListingId};
use serde::Deserialize;

/// Text fields of the create form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DraftField {
    Title,
    Description,
    Price,
}

/// Events that trigger listing transitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    // Collection
    Refresh,
    Loaded { listings: Vec<Listing> },
    LoadFailed { message: String },

    // Create form
    EditDraft { field: DraftField, value: String },
    ToggleCategory { category: String, selected: bool },
    Create { draft: DraftListing },
    Created { id: ListingId },
    CreateFailed { message: String },
}
