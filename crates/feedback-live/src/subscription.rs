//! socket.io WebSocket subscription
//!
//! Speaks just enough Engine.IO v4 to join the default namespace, answer
//! heartbeats and forward named events. Events reach the receiver in the
//! order the server sent them.

use crate::error::{LiveError, Result};
use crate::event::LiveEvent;
use crate::packet::{connect_packet, Packet, PONG};
use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, error, info, warn};

const SOCKET_IO_PATH: &str = "socket.io/?EIO=4&transport=websocket";
const MAX_RECONNECT_ATTEMPTS: u32 = 10;
const INITIAL_RECONNECT_DELAY: Duration = Duration::from_secs(1);

/// Configuration for the live subscription
#[derive(Debug, Clone, Default)]
pub struct LiveConfig {
    /// Backend origin, `http(s)://` or `ws(s)://`
    pub base_url: String,
    /// Event names to forward; empty forwards every event
    pub events: Vec<String>,
    /// Sent with the namespace connect packet
    pub auth: Option<Value>,
}

impl LiveConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn with_events<I, S>(mut self, events: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.events = events.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_token(mut self, token: &str) -> Self {
        self.auth = Some(serde_json::json!({ "token": token }));
        self
    }

    fn wants(&self, event: &str) -> bool {
        self.events.is_empty() || self.events.iter().any(|e| e == event)
    }
}

/// What the read loop should do after a frame
#[derive(Debug, PartialEq)]
enum Step {
    Continue,
    Reply(String),
    Stop,
}

/// Live subscription that connects and streams events
pub struct LiveSubscription {
    config: LiveConfig,
    event_tx: mpsc::Sender<LiveEvent>,
    reconnect_attempts: u32,
}

impl LiveSubscription {
    pub fn new(config: LiveConfig, event_tx: mpsc::Sender<LiveEvent>) -> Self {
        Self {
            config,
            event_tx,
            reconnect_attempts: 0,
        }
    }

    /// Start the subscription (runs until the server disconnects us, the
    /// receiver is dropped, or reconnection gives up)
    pub async fn run(&mut self) -> Result<()> {
        loop {
            match self.connect_and_stream().await {
                Ok(()) => {
                    info!("Live connection closed cleanly");
                    break;
                }
                Err(e) => {
                    error!(error = %e, "Live connection error");
                    let _ = self.event_tx.send(LiveEvent::Error(e.to_string())).await;

                    self.reconnect_attempts += 1;
                    if self.reconnect_attempts >= MAX_RECONNECT_ATTEMPTS {
                        return Err(LiveError::MaxReconnectAttempts);
                    }

                    let delay = INITIAL_RECONNECT_DELAY * 2u32.pow(self.reconnect_attempts - 1);
                    warn!(
                        "Reconnecting in {:?} (attempt {}/{})",
                        delay, self.reconnect_attempts, MAX_RECONNECT_ATTEMPTS
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }

        Ok(())
    }

    async fn connect_and_stream(&mut self) -> Result<()> {
        let url = self.build_url();
        info!(url = %url, "Connecting to live updates");

        let (ws_stream, _) = connect_async(url.as_str()).await?;
        let (mut write, mut read) = ws_stream.split();

        while let Some(msg) = read.next().await {
            match msg {
                Ok(Message::Text(text)) => match self.handle_text(&text).await? {
                    Step::Continue => {}
                    Step::Reply(reply) => write.send(Message::Text(reply.into())).await?,
                    Step::Stop => return Ok(()),
                },
                Ok(Message::Close(_)) => {
                    info!("Received close frame");
                    let _ = self.event_tx.send(LiveEvent::Disconnected).await;
                    return Err(LiveError::ConnectionClosed);
                }
                Ok(_) => {
                    // Binary attachments and WebSocket level pings are not used
                }
                Err(e) => {
                    let _ = self.event_tx.send(LiveEvent::Disconnected).await;
                    return Err(e.into());
                }
            }
        }

        let _ = self.event_tx.send(LiveEvent::Disconnected).await;
        Err(LiveError::ConnectionClosed)
    }

    fn build_url(&self) -> String {
        let base = self.config.base_url.trim_end_matches('/');
        let base = if let Some(rest) = base.strip_prefix("https://") {
            format!("wss://{}", rest)
        } else if let Some(rest) = base.strip_prefix("http://") {
            format!("ws://{}", rest)
        } else {
            base.to_string()
        };
        format!("{}/{}", base, SOCKET_IO_PATH)
    }

    async fn emit(&self, event: LiveEvent) -> Step {
        match self.event_tx.send(event).await {
            Ok(()) => Step::Continue,
            Err(_) => {
                debug!("Live event receiver dropped, stopping");
                Step::Stop
            }
        }
    }

    async fn handle_text(&mut self, text: &str) -> Result<Step> {
        let packet = match Packet::parse(text) {
            Ok(packet) => packet,
            Err(e) => {
                debug!(error = %e, "Ignoring unreadable frame");
                return Ok(Step::Continue);
            }
        };

        match packet {
            Packet::Open(params) => {
                debug!(sid = ?params.get("sid"), "Engine.IO handshake");
                Ok(Step::Reply(connect_packet(self.config.auth.as_ref())))
            }
            Packet::Ping => Ok(Step::Reply(PONG.to_string())),
            Packet::Connect => {
                info!("Live connection established");
                self.reconnect_attempts = 0;
                Ok(self.emit(LiveEvent::Connected).await)
            }
            Packet::Event { event, payload } => {
                if !self.config.wants(&event) {
                    return Ok(Step::Continue);
                }
                debug!(event = %event, "Live event");
                Ok(self.emit(LiveEvent::Message { event, payload }).await)
            }
            Packet::Disconnect => {
                info!("Server closed the namespace");
                let _ = self.event_tx.send(LiveEvent::Disconnected).await;
                Ok(Step::Stop)
            }
            Packet::Close => {
                let _ = self.event_tx.send(LiveEvent::Disconnected).await;
                Err(LiveError::ConnectionClosed)
            }
            Packet::ConnectError(message) => Err(LiveError::Rejected(message)),
            Packet::Pong | Packet::Noop | Packet::Other(_) => Ok(Step::Continue),
        }
    }
}
