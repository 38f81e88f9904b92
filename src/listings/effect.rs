//! Effects produced by listing transitions

use crate::remote::{ListingId, NewListing};

/// Effects to be executed after a listing transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Fetch the full collection from the remote service
    LoadListings,

    /// Submit a new listing to the remote service
    CreateListing { listing: NewListing },

    /// The backend accepted a listing
    ListingCreated { id: ListingId },

    /// Generic failure notification for the user
    Alert { message: String },

    /// Publish collection and draft to observers
    Publish,
}
