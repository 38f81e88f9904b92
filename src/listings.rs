//! Tour listing synchronization state machine
//!
//! Loads the listing collection, owns the create form, and reloads from the
//! server after every successful create.

mod effect;
pub mod event;
pub mod state;
pub(crate) mod transition;


pub use effect::Effect;
pub use event::{DraftField, Event};
pub use state::{CategorySet, DraftListing, ListingsContext, ListingsState, LoadPhase};
#[allow(unused_imports)] // Public API re-exports
pub use transition::{transition, validate, TransitionError, TransitionResult, ValidationError};
