//! Listing state types

use crate::config::{CategoryOptions, ListingCopy};
use crate::remote::Listing;
use serde::{Deserialize, Serialize};

/// Selected categories of a draft
///
/// Behaves as a set but remembers selection order, which is the order the
/// backend receives.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct CategorySet(Vec<String>);

impl CategorySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, category: &str) -> bool {
        self.0.iter().any(|c| c == category)
    }

    /// Returns false if the category was already selected
    pub fn insert(&mut self, category: impl Into<String>) -> bool {
        let category = category.into();
        if self.contains(&category) {
            return false;
        }
        self.0.push(category);
        true
    }

    pub fn remove(&mut self, category: &str) {
        self.0.retain(|c| c != category);
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    #[allow(dead_code)] // Collection API completeness
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[allow(dead_code)] // Collection API completeness
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.0.clone()
    }
}

impl From<Vec<String>> for CategorySet {
    fn from(categories: Vec<String>) -> Self {
        let mut set = Self::new();
        for category in categories {
            set.insert(category);
        }
        set
    }
}

impl From<CategorySet> for Vec<String> {
    fn from(set: CategorySet) -> Self {
        set.0
    }
}

/// Client-side create form. Price stays text until validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftListing {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub categories: CategorySet,
}

impl DraftListing {
    #[allow(dead_code)] // Used to check a reset form
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LoadPhase {
    #[default]
    Idle,
    /// A fetch is in flight. `reload_queued` asks for one more fetch once it
    /// settles, so a refresh requested mid-flight still sees fresh data.
    Loading { reload_queued: bool },
}

/// State of the listing collection and create form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ListingsState {
    pub listings: Vec<Listing>,
    pub load: LoadPhase,
    pub draft: DraftListing,
    pub submitting: bool,
}

impl ListingsState {
    pub fn loading(&self) -> bool {
        matches!(self.load, LoadPhase::Loading { .. })
    }
}

/// Fixed configuration of the listing form
#[derive(Debug, Clone)]
pub struct ListingsContext {
    pub options: CategoryOptions,
    pub copy: ListingCopy,
}

impl ListingsContext {
    pub fn new(options: CategoryOptions, copy: ListingCopy) -> Self {
        Self { options, copy }
    }
}
