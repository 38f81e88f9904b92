//! Effects produced by chat transitions

use crate::remote::ChatTurn;

/// Effects to be executed after a chat transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Ask the remote service for a reply to these turns
    RequestReply { turns: Vec<ChatTurn> },

    /// Publish the new transcript to observers
    Publish,
}
