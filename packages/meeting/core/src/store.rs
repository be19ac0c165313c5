use crate::{
    actions::Action,
    effects::Effect,
    events::MeetingEvent,
    reducer::{apply, dropped_by},
    state::{DropStats, SessionState},
    types::*,
};

/// Display name for the local user when none is configured
pub const DEFAULT_AUTHOR: &str = "老韭菜";

/// Owner of one session's state.
///
/// All mutation goes through [`SessionStore::dispatch`]; observers read
/// through [`SessionStore::state`] and can poll [`SessionStore::version`] to
/// notice changes.
#[derive(Debug, Clone)]
pub struct SessionStore {
    state: SessionState,
    dropped: DropStats,
    version: u64,
    author: String,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::with_author(DEFAULT_AUTHOR)
    }

    /// `author` is the display name put on the local user's messages.
    pub fn with_author(author: impl Into<String>) -> Self {
        Self {
            state: SessionState::default(),
            dropped: DropStats::default(),
            version: 0,
            author: author.into(),
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn dropped(&self) -> &DropStats {
        &self.dropped
    }

    /// Bumped once per applied action
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn dispatch(&mut self, action: Action) -> Vec<Effect> {
        match &action {
            Action::Ingest(event) => {
                if let Some(dropped) = dropped_by(&self.state, event) {
                    self.dropped.record(dropped);
                }
            }
            Action::SetSymbol { .. } => self.dropped = DropStats::default(),
            _ => {}
        }

        let effects = apply(&mut self.state, action);
        self.version += 1;
        effects
    }

    pub fn set_symbol(&mut self, symbol: impl Into<String>) {
        self.dispatch(Action::SetSymbol {
            symbol: symbol.into(),
        });
    }

    pub fn add_message(&mut self, message: Message) {
        self.dispatch(Action::AddMessage { message });
    }

    pub fn set_simulating(&mut self, simulating: bool) {
        self.dispatch(Action::SetSimulating { simulating });
    }

    pub fn set_status(&mut self, text: impl Into<String>) {
        self.dispatch(Action::SetStatus { text: text.into() });
    }

    /// Empties the transcript; plans and step state stay.
    pub fn clear_history(&mut self) {
        self.dispatch(Action::ClearHistory);
    }

    pub fn request_clear_history(&mut self) -> Vec<Effect> {
        self.dispatch(Action::RequestClearHistory)
    }

    pub fn submit_query(&mut self, query: impl Into<String>) -> Vec<Effect> {
        let author = self.author.clone();
        self.dispatch(Action::SubmitQuery {
            query: query.into(),
            author,
        })
    }

    pub fn submission_failed(&mut self, error: impl Into<String>) {
        self.dispatch(Action::SubmissionFailed {
            error: error.into(),
        });
    }

    pub fn ingest(&mut self, event: MeetingEvent) {
        self.dispatch(Action::Ingest(event));
    }
}
