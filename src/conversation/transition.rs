//! Pure chat transition function

use super::{ChatContext, ChatPhase, ChatState, Effect, Event, Turn};
use thiserror::Error;

/// Result of a chat transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: ChatState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: ChatState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Reasons a chat event is not applied. The state is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("Message is empty")]
    EmptyInput,
    #[error("Assistant is busy with another message")]
    Busy,
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),
}

/// Pure transition function
///
/// Given the same inputs it always produces the same outputs; remote calls
/// only appear as [`Effect::RequestReply`].
pub fn transition(
    state: &ChatState,
    context: &ChatContext,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    match (state.phase, event) {
        (_, Event::InputChanged { text }) => {
            let mut next = state.clone();
            next.pending_input = text;
            Ok(TransitionResult::new(next).with_effect(Effect::Publish))
        }

        // ============================================================
        // Submission
        // ============================================================
        (_, Event::Submit { text }) if text.trim().is_empty() => Err(TransitionError::EmptyInput),

        (ChatPhase::AwaitingReply, Event::Submit { .. } | Event::Clear) => {
            Err(TransitionError::Busy)
        }

        (ChatPhase::Idle, Event::Submit { text }) => {
            let mut next = state.clone();
            next.transcript.push(Turn::User { text });
            let turns = next.transcript.outbound();
            next.transcript.push(Turn::Pending {
                text: context.copy.placeholder.clone(),
            });
            next.pending_input.clear();
            next.phase = ChatPhase::AwaitingReply;

            Ok(TransitionResult::new(next)
                .with_effect(Effect::RequestReply { turns })
                .with_effect(Effect::Publish))
        }

        // ============================================================
        // Settlement
        // ============================================================
        (ChatPhase::AwaitingReply, Event::ReplyReceived { reply }) => {
            let mut next = state.clone();
            next.transcript.settle_pending(Turn::System { text: reply });
            next.phase = ChatPhase::Idle;
            Ok(TransitionResult::new(next).with_effect(Effect::Publish))
        }

        (ChatPhase::AwaitingReply, Event::ReplyFailed { .. }) => {
            let mut next = state.clone();
            next.transcript.settle_pending(Turn::System {
                text: context.copy.failure.clone(),
            });
            next.phase = ChatPhase::Idle;
            Ok(TransitionResult::new(next).with_effect(Effect::Publish))
        }

        (ChatPhase::Idle, Event::Clear) => {
            let mut next = state.clone();
            next.transcript.clear();
            Ok(TransitionResult::new(next).with_effect(Effect::Publish))
        }

        // ============================================================
        // Invalid Transitions
        // ============================================================
        (phase, event) => Err(TransitionError::InvalidTransition(format!(
            "No transition from {phase:?} with event {event:?}"
        ))),
    }
}
