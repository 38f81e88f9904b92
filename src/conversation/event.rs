//! Events that can occur in the assistant panel

/// Events that trigger chat transitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    // User events
    InputChanged { text: String },
    Submit { text: String },
    Clear,

    // Remote settlement
    ReplyReceived { reply: String },
    ReplyFailed { message: String },
}

impl Event {
    pub fn submit(text: impl Into<String>) -> Self {
        Event::Submit { text: text.into() }
    }
}
