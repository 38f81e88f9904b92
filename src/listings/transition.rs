//! Pure listing transition function

use super::{
    DraftField, DraftListing, Effect, Event, ListingsContext, ListingsState, LoadPhase,
};
use crate::remote::NewListing;
use thiserror::Error;

/// Result of a listing transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: ListingsState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: ListingsState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn with_effects(mut self, effects: impl IntoIterator<Item = Effect>) -> Self {
        self.effects.extend(effects);
        self
    }
}

/// Create form validation failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Title, description and price are required")]
    MissingFields,
    #[error("Price must be a whole number")]
    InvalidPrice,
}

impl ValidationError {
    /// Localized text shown to the user
    pub fn user_message(self, context: &ListingsContext) -> &str {
        match self {
            ValidationError::MissingFields => &context.copy.missing_fields,
            ValidationError::InvalidPrice => &context.copy.invalid_price,
        }
    }
}

/// Reasons a listing event is not applied. The state is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("Invalid listing: {0}")]
    Validation(ValidationError),
    #[error("A listing is already being created")]
    Busy,
    #[error("Unknown category: {0}")]
    UnknownCategory(String),
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),
}

/// Check the draft and build the request the backend expects
pub fn validate(draft: &DraftListing) -> Result<NewListing, ValidationError> {
    let title = draft.title.trim();
    let description = draft.description.trim();
    let price = draft.price.trim();

    if title.is_empty() || description.is_empty() || price.is_empty() {
        return Err(ValidationError::MissingFields);
    }

    let price: u64 = price.parse().map_err(|_| ValidationError::InvalidPrice)?;

    Ok(NewListing {
        title: draft.title.clone(),
        description: draft.description.clone(),
        price,
        categories: draft.categories.to_vec(),
    })
}

/// Start a load, or queue one behind the load already in flight
fn begin_load(state: &mut ListingsState) -> Option<Effect> {
    match state.load {
        LoadPhase::Idle => {
            state.load = LoadPhase::Loading {
                reload_queued: false,
            };
            Some(Effect::LoadListings)
        }
        LoadPhase::Loading { .. } => {
            state.load = LoadPhase::Loading {
                reload_queued: true,
            };
            None
        }
    }
}

/// Settle the load in flight, starting the queued one if any
fn finish_load(state: &mut ListingsState, reload_queued: bool) -> Option<Effect> {
    if reload_queued {
        state.load = LoadPhase::Loading {
            reload_queued: false,
        };
        Some(Effect::LoadListings)
    } else {
        state.load = LoadPhase::Idle;
        None
    }
}

/// Pure transition function
pub fn transition(
    state: &ListingsState,
    context: &ListingsContext,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    match (state.load, state.submitting, event) {
        // ============================================================
        // Collection
        // ============================================================
        (_, _, Event::Refresh) => {
            let mut next = state.clone();
            let load = begin_load(&mut next);
            Ok(TransitionResult::new(next)
                .with_effects(load)
                .with_effect(Effect::Publish))
        }

        (LoadPhase::Loading { reload_queued }, _, Event::Loaded { listings }) => {
            let mut next = state.clone();
            next.listings = listings;
            let load = finish_load(&mut next, reload_queued);
            Ok(TransitionResult::new(next)
                .with_effects(load)
                .with_effect(Effect::Publish))
        }

        // Prior listings stay on screen
        (LoadPhase::Loading { reload_queued }, _, Event::LoadFailed { .. }) => {
            let mut next = state.clone();
            let load = finish_load(&mut next, reload_queued);
            Ok(TransitionResult::new(next)
                .with_effects(load)
                .with_effect(Effect::Publish))
        }

        // ============================================================
        // Create form
        // ============================================================
        (_, _, Event::EditDraft { field, value }) => {
            let mut next = state.clone();
            match field {
                DraftField::Title => next.draft.title = value,
                DraftField::Description => next.draft.description = value,
                DraftField::Price => next.draft.price = value,
            }
            Ok(TransitionResult::new(next).with_effect(Effect::Publish))
        }

        (_, _, Event::ToggleCategory { category, .. }) if !context.options.contains(&category) => {
            Err(TransitionError::UnknownCategory(category))
        }

        (_, _, Event::ToggleCategory { category, selected }) => {
            let mut next = state.clone();
            if selected {
                next.draft.categories.insert(category);
            } else {
                next.draft.categories.remove(&category);
            }
            Ok(TransitionResult::new(next).with_effect(Effect::Publish))
        }

        (_, true, Event::Create { .. }) => Err(TransitionError::Busy),

        (_, false, Event::Create { draft }) => {
            let listing = validate(&draft).map_err(TransitionError::Validation)?;
            if let Some(unknown) = draft.categories.iter().find(|c| !context.options.contains(c)) {
                return Err(TransitionError::UnknownCategory(unknown.to_string()));
            }
            let mut next = state.clone();
            next.draft = draft;
            next.submitting = true;
            Ok(TransitionResult::new(next)
                .with_effect(Effect::CreateListing { listing })
                .with_effect(Effect::Publish))
        }

        // Reload instead of appending locally so server-assigned fields show up
        (_, true, Event::Created { id }) => {
            let mut next = state.clone();
            next.submitting = false;
            next.draft = DraftListing::default();
            let load = begin_load(&mut next);
            Ok(TransitionResult::new(next)
                .with_effect(Effect::ListingCreated { id })
                .with_effects(load)
                .with_effect(Effect::Publish))
        }

        // Draft is kept so the user can retry
        (_, true, Event::CreateFailed { .. }) => {
            let mut next = state.clone();
            next.submitting = false;
            Ok(TransitionResult::new(next)
                .with_effect(Effect::Alert {
                    message: context.copy.create_failed.clone(),
                })
                .with_effect(Effect::Publish))
        }

        // ============================================================
        // Invalid Transitions
        // ============================================================
        (load, submitting, event) => Err(TransitionError::InvalidTransition(format!(
            "No transition from load={load:?} submitting={submitting} with event {event:?}"
        ))),
    }
}
