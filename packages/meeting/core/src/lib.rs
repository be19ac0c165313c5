pub mod actions;
pub mod effects;
pub mod events;
pub mod reducer;
pub mod state;
pub mod store;
pub mod types;

#[cfg(test)]
mod tests;

pub use actions::Action;
pub use effects::Effect;
pub use events::{decode_event, DecodeError, MeetingEvent, RawEnvelope};
pub use reducer::{apply, reduce};
pub use state::{DropStats, DroppedEvent, SessionState};
pub use store::SessionStore;
