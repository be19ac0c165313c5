use crate::api::MeetingBackend;
use crate::error::Result;
use meeting_core::events::StateChangePayload;
use meeting_core::{Effect, MeetingEvent, SessionState, SessionStore};
use tokio::sync::mpsc;
use tracing::{error, info};

/// Hosts one [`SessionStore`] and performs the effects it asks for.
pub struct MeetingHost<B> {
    store: SessionStore,
    backend: B,
}

impl<B: MeetingBackend> MeetingHost<B> {
    pub fn new(backend: B, author: impl Into<String>) -> Self {
        Self {
            store: SessionStore::with_author(author),
            backend,
        }
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn state(&self) -> &SessionState {
        self.store.state()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn switch_symbol(&mut self, symbol: impl Into<String>) {
        let symbol = symbol.into();
        info!(%symbol, "switching meeting symbol");
        self.store.set_symbol(symbol);
    }

    pub fn ingest(&mut self, event: MeetingEvent) {
        self.store.ingest(event);
    }

    /// Post a query. Only the initial acknowledgement is awaited; the rest of
    /// the meeting arrives through [`MeetingHost::pump`].
    pub async fn submit(&mut self, query: impl Into<String>) -> Result<()> {
        let effects = self.store.submit_query(query);
        self.run_effects(effects).await
    }

    /// Clear the local transcript and ask the server to do the same.
    pub async fn clear_history(&mut self) -> Result<()> {
        let effects = self.store.request_clear_history();
        self.run_effects(effects).await
    }

    async fn run_effects(&mut self, effects: Vec<Effect>) -> Result<()> {
        for effect in effects {
            match effect {
                Effect::StartSession { symbol_key, query } => {
                    if let Err(err) = self.backend.start_session(&symbol_key, &query).await {
                        error!(%symbol_key, error = %err, "failed to start meeting");
                        self.store.submission_failed(err.to_string());
                        return Err(err);
                    }
                }
                Effect::ClearRemoteHistory { symbol_key } => {
                    if let Err(err) = self.backend.clear_history(&symbol_key).await {
                        error!(%symbol_key, error = %err, "failed to clear remote history");
                        return Err(err);
                    }
                }
            }
        }
        Ok(())
    }

    /// Apply events from `rx` until the channel closes or a terminal event
    /// leaves the session idle. `observe` sees each event after it is applied.
    ///
    /// Returns the number of events applied.
    pub async fn pump<F>(&mut self, rx: &mut mpsc::UnboundedReceiver<MeetingEvent>, mut observe: F) -> usize
    where
        F: FnMut(&MeetingEvent, &SessionStore),
    {
        let mut applied = 0;
        while let Some(event) = rx.recv().await {
            let terminal = is_terminal(&event);
            self.store.ingest(event.clone());
            applied += 1;
            observe(&event, &self.store);

            if terminal && !self.store.state().is_simulating {
                break;
            }
        }
        applied
    }
}

/// Events after which the producer sends nothing more for the current turn
pub fn is_terminal(event: &MeetingEvent) -> bool {
    match event {
        MeetingEvent::Finished(_) | MeetingEvent::Error(_) => true,
        MeetingEvent::StateChange(StateChangePayload { status }) => status == "done" || status == "error",
        _ => false,
    }
}
