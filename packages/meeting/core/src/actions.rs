use crate::events::MeetingEvent;
use crate::types::Message;

/// Everything that can change a [`crate::SessionState`]
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // Session lifecycle
    SetSymbol { symbol: String },
    ClearHistory,
    /// Local clear plus a purge request to the server
    RequestClearHistory,

    // Direct mutations
    AddMessage { message: Message },
    SetSimulating { simulating: bool },
    SetStatus { text: String },

    // Query submission
    SubmitQuery { query: String, author: String },
    SubmissionFailed { error: String },

    // Server push
    Ingest(MeetingEvent),
}
