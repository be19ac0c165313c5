use crate::api::{ApiClient, MeetingBackend};
use crate::config::ClientConfig;
use crate::error::{ClientError, ConfigError, Result};
use crate::host::is_terminal;
use futures::StreamExt;
use meeting_core::events::ErrorPayload;
use meeting_core::{decode_event, MeetingEvent};
use reqwest::Url;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::{
    connect_async, tungstenite::Message as Frame, MaybeTlsStream, WebSocketStream,
};
use tracing::{debug, error, info, warn};

/// `{ws_base}/ws/meeting?symbol_key=…&query=…`
pub fn meeting_url(ws_base: &str, symbol_key: &str, query: &str) -> Result<Url> {
    let raw = format!("{}/ws/meeting", ws_base.trim_end_matches('/'));
    Url::parse_with_params(&raw, &[("symbol_key", symbol_key), ("query", query)]).map_err(|e| {
        ClientError::Config(ConfigError::Url {
            url: raw.clone(),
            reason: e.to_string(),
        })
    })
}

/// Decode one text frame, logging and dropping anything that does not parse.
pub fn handle_frame(text: &str) -> Option<MeetingEvent> {
    match decode_event(text) {
        Ok(event) => Some(event),
        Err(err) => {
            warn!(error = %err, "dropping undecodable meeting frame");
            None
        }
    }
}

/// An open meeting socket.
///
/// Opening the socket is what starts the meeting on the server, so a dropped
/// connection is never retried.
pub struct MeetingStream {
    socket: WebSocketStream<MaybeTlsStream<TcpStream>>,
    url: Url,
}

impl MeetingStream {
    pub async fn open(url: Url) -> Result<Self> {
        let (socket, _response) = connect_async(url.as_str()).await?;
        info!(url = %url, "meeting stream connected");
        Ok(Self { socket, url })
    }

    /// Forward decoded events until the server closes the socket or the
    /// receiver goes away.
    ///
    /// A socket that ends before any terminal event is reported as an `error`
    /// event, so the session never stays busy.
    pub async fn forward(mut self, tx: mpsc::UnboundedSender<MeetingEvent>) -> Result<()> {
        let mut finished = false;
        while let Some(frame) = self.socket.next().await {
            let event = match frame? {
                Frame::Text(text) => handle_frame(&text),
                Frame::Binary(bytes) => match std::str::from_utf8(&bytes) {
                    Ok(text) => handle_frame(text),
                    Err(err) => {
                        warn!(error = %err, "dropping non-UTF-8 meeting frame");
                        None
                    }
                },
                Frame::Close(reason) => {
                    info!(url = %self.url, ?reason, "meeting stream closed by server");
                    break;
                }
                _ => None,
            };

            if let Some(event) = event {
                finished |= is_terminal(&event);
                if tx.send(event).is_err() {
                    debug!("event receiver dropped, closing meeting stream");
                    return Ok(());
                }
            }
        }

        if !finished {
            warn!(url = %self.url, "meeting stream ended before the meeting finished");
            let _ = tx.send(MeetingEvent::Error(ErrorPayload {
                message: "connection closed".to_string(),
            }));
        }

        Ok(())
    }
}

/// Backend that starts meetings by opening the event socket, the way the
/// web frontend does, and forwards everything it receives to `tx`.
///
/// History purges still go over REST.
#[derive(Debug, Clone)]
pub struct SocketBackend {
    ws_base: String,
    api: ApiClient,
    tx: mpsc::UnboundedSender<MeetingEvent>,
}

impl SocketBackend {
    pub fn new(config: &ClientConfig, tx: mpsc::UnboundedSender<MeetingEvent>) -> Result<Self> {
        Ok(Self {
            ws_base: config.ws_base()?,
            api: ApiClient::from_config(config)?,
            tx,
        })
    }
}

impl MeetingBackend for SocketBackend {
    async fn start_session(&self, symbol_key: &str, query: &str) -> Result<()> {
        let url = meeting_url(&self.ws_base, symbol_key, query)?;
        let stream = MeetingStream::open(url).await?;

        let tx = self.tx.clone();
        tokio::spawn(async move {
            if let Err(err) = stream.forward(tx.clone()).await {
                error!(error = %err, "meeting stream failed");
                // A lost connection ends the turn
                let _ = tx.send(MeetingEvent::Error(ErrorPayload {
                    message: format!("connection lost: {}", err),
                }));
            }
        });

        Ok(())
    }

    async fn clear_history(&self, symbol_key: &str) -> Result<()> {
        self.api.clear_history(symbol_key).await
    }
}
