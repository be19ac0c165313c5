pub mod api;
pub mod config;
pub mod error;
pub mod host;
pub mod stream;

#[cfg(test)]
mod tests;

pub use api::{ApiClient, MeetingBackend};
pub use config::ClientConfig;
pub use error::{ClientError, ConfigError, Result};
pub use host::{is_terminal, MeetingHost};
pub use stream::{handle_frame, meeting_url, MeetingStream, SocketBackend};
