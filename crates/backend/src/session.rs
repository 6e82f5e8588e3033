use serde::Serialize;

/// A session keeps at most this many exchanges; older ones are dropped on
/// append.
pub const MAX_EXCHANGES_PER_SESSION: usize = 10;

/// How many of the most recent exchanges are rendered into the prompt for a
/// new request.
pub const HISTORY_WINDOW: usize = 5;

/// One user message paired with the assistant's reply.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Exchange {
    pub user: String,
    pub assistant: String,
}

impl Exchange {
    pub fn new(user: impl Into<String>, assistant: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            assistant: assistant.into(),
        }
    }
}
