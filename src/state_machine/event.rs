//! Events that can occur in a dialogue

/// Events that trigger state transitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The customer typed something
    Reply { text: String },
    /// The customer (or client) asked to start over
    Restart,
}

impl Event {
    pub fn reply(text: impl Into<String>) -> Self {
        Event::Reply { text: text.into() }
    }
}
