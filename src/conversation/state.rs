//! Chat state types

use crate::config::ChatCopy;
use crate::remote::{ChatTurn, Speaker};
use serde::{Deserialize, Serialize};

// ============================================================================
// Turns
// ============================================================================

/// One entry of the transcript, tagged by what produced it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Turn {
    /// Fixed opening message; always first, never sent
    Greeting { text: String },
    User { text: String },
    System { text: String },
    /// Stand-in shown while a reply is outstanding; never sent
    Pending { text: String },
}

impl Turn {
    #[allow(dead_code)] // Turn inspection helper
    pub fn speaker(&self) -> Speaker {
        match self {
            Turn::User { .. } => Speaker::User,
            Turn::Greeting { .. } | Turn::System { .. } | Turn::Pending { .. } => Speaker::System,
        }
    }

    #[allow(dead_code)] // Turn inspection helper
    pub fn text(&self) -> &str {
        match self {
            Turn::Greeting { text }
            | Turn::User { text }
            | Turn::System { text }
            | Turn::Pending { text } => text,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Turn::Pending { .. })
    }

    /// Wire form of the turn, if it is ever sent to the backend
    pub fn to_wire(&self) -> Option<ChatTurn> {
        match self {
            Turn::User { text } => Some(ChatTurn::user(text.clone())),
            Turn::System { text } => Some(ChatTurn::system(text.clone())),
            Turn::Greeting { .. } | Turn::Pending { .. } => None,
        }
    }
}

// ============================================================================
// Transcript
// ============================================================================

/// Ordered chat turns; insertion order is display order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    pub fn new(greeting: impl Into<String>) -> Self {
        Self {
            turns: vec![Turn::Greeting {
                text: greeting.into(),
            }],
        }
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    #[allow(dead_code)] // Transcript inspection helper
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    #[allow(dead_code)] // Transcript inspection helper
    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    pub fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    #[allow(dead_code)] // Transcript inspection helper
    pub fn has_pending(&self) -> bool {
        self.turns.iter().any(Turn::is_pending)
    }

    /// Turns the backend gets to see: no greeting, no placeholder
    pub fn outbound(&self) -> Vec<ChatTurn> {
        self.turns.iter().filter_map(Turn::to_wire).collect()
    }

    /// Drop the placeholder and append the turn that settles it
    pub fn settle_pending(&mut self, turn: Turn) {
        self.turns.retain(|t| !t.is_pending());
        self.turns.push(turn);
    }

    /// Remove everything but the greeting
    pub fn clear(&mut self) {
        self.turns.truncate(1);
    }
}

// ============================================================================
// Chat State
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatPhase {
    /// Ready for input
    #[default]
    Idle,
    /// One request in flight; further submits are rejected
    AwaitingReply,
}

/// State of the assistant panel
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatState {
    pub transcript: Transcript,
    pub pending_input: String,
    pub phase: ChatPhase,
}

impl ChatState {
    pub fn new(context: &ChatContext) -> Self {
        Self {
            transcript: Transcript::new(context.copy.greeting.clone()),
            pending_input: String::new(),
            phase: ChatPhase::Idle,
        }
    }

    pub fn busy(&self) -> bool {
        self.phase == ChatPhase::AwaitingReply
    }
}

/// Fixed configuration of the assistant panel
#[derive(Debug, Clone)]
pub struct ChatContext {
    pub copy: ChatCopy,
}

impl ChatContext {
    pub fn new(copy: ChatCopy) -> Self {
        Self { copy }
    }
}
