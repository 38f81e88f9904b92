//! Types exchanged with the remote service

use crate::identity::Principal;
use serde::{Deserialize, Serialize};

pub type ListingId = u64;

/// Who authored a chat turn, as the backend sees it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    User,
    System,
}

/// One turn of the transcript sent to the assistant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub speaker: Speaker,
    pub text: String,
}

impl ChatTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::User,
            text: text.into(),
        }
    }

    pub fn system(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::System,
            text: text.into(),
        }
    }
}

fn available_by_default() -> bool {
    true
}

/// A tour offering as stored by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    pub id: ListingId,
    pub title: String,
    pub description: String,
    pub price: u64,
    #[serde(default)]
    pub categories: Vec<String>,
    pub creator: Principal,
    #[serde(default = "available_by_default")]
    pub available: bool,
}

impl Listing {
    pub fn is_owned_by(&self, principal: &Principal) -> bool {
        &self.creator == principal
    }
}

/// Fields of a listing the client submits; the backend assigns the rest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewListing {
    pub title: String,
    pub description: String,
    pub price: u64,
    pub categories: Vec<String>,
}
