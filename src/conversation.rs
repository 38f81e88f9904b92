//! Assistant conversation state machine
//!
//! Pure transitions over the chat transcript. Remote calls are described as
//! effects and executed by the runtime.

mod effect;
pub mod event;
pub mod state;
pub(crate) mod transition;


pub use effect::Effect;
pub use event::Event;
#[allow(unused_imports)] // Public API re-exports
pub use state::{ChatContext, ChatPhase, ChatState, Transcript, Turn};
#[allow(unused_imports)] // Public API re-exports
pub use transition::{transition, TransitionError, TransitionResult};
