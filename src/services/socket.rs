//! Websocket event stream for the vendor chat API.
//!
//! One connection per scenario run. The backend sends a `health.check` event
//! immediately after connecting, carrying the `connection_id` that later REST
//! calls reference, then pushes channel events as the scripted REST sequence
//! triggers them.
//!
//! There is no reconnect logic: a dropped connection fails the run.

use std::collections::VecDeque;
use std::time::Duration;

use futures::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio::net::TcpStream;
use tokio::time::{timeout, timeout_at, Instant};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use url::Url;

use crate::config::ApiConfig;
use crate::error::{Error, Result};
use crate::models::{Event, EventType, UserSpec};

/// A live websocket connection to the chat backend.
pub struct EventSocket {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
    /// Events read off the wire but not yet claimed by a `wait_for` call.
    /// The backend is free to interleave events between scripted steps.
    pending: VecDeque<Event>,
    event_timeout: Duration,
    connection_id: String,
}

impl EventSocket {
    /// Connect and perform the `health.check` handshake.
    ///
    /// Returns the socket and the raw handshake event so the caller can
    /// record it like any other response.
    pub async fn connect(
        config: &ApiConfig,
        user: &UserSpec,
        token: &str,
    ) -> Result<(Self, Value)> {
        let url = Self::connect_url(config, user, token)?;

        let (stream, _) = connect_async(url.as_str()).await?;
        tracing::debug!(user = %user.id, "websocket connected");

        let mut socket = Self {
            stream,
            pending: VecDeque::new(),
            event_timeout: Duration::from_secs(config.event_timeout_secs),
            connection_id: String::new(),
        };

        let hello = timeout(socket.event_timeout, socket.read_event())
            .await
            .map_err(|_| Error::EventTimeout {
                event_type: EventType::HealthCheck.to_string(),
                waited_secs: config.event_timeout_secs,
            })??;

        if !hello.is(EventType::HealthCheck) {
            return Err(Error::Socket(format!(
                "Expected health.check handshake, got {:?}",
                hello.event_type()
            )));
        }
        socket.connection_id = hello
            .connection_id()
            .ok_or_else(|| Error::Socket("health.check without connection_id".to_string()))?
            .to_string();

        tracing::info!(connection_id = %socket.connection_id, "websocket handshake complete");
        Ok((socket, hello.into_inner()))
    }

    fn connect_url(config: &ApiConfig, user: &UserSpec, token: &str) -> Result<Url> {
        let payload = json!({
            "user_id": user.id,
            "user_details": { "id": user.id, "name": user.name, "image": user.image },
            "server_determines_connection_id": true,
        });

        let mut url = Url::parse(&format!("{}/connect", config.ws_url))?;
        url.query_pairs_mut()
            .append_pair("json", &payload.to_string())
            .append_pair("api_key", &config.api_key)
            .append_pair("authorization", token)
            .append_pair("stream-auth-type", "jwt");
        Ok(url)
    }

    /// Connection id assigned by the backend during the handshake.
    pub fn connection_id(&self) -> &str {
        &self.connection_id
    }

    /// Wait for an event of the given type, optionally scoped to a channel
    /// cid. Keepalive `health.check` events are skipped; other non-matching
    /// events are buffered for later waits.
    pub async fn wait_for(&mut self, event_type: EventType, cid: Option<&str>) -> Result<Value> {
        if let Some(index) = self
            .pending
            .iter()
            .position(|e| Self::matches(e, event_type, cid))
        {
            let event = self.pending.remove(index).expect("index in bounds");
            return Ok(event.into_inner());
        }

        let deadline = Instant::now() + self.event_timeout;
        loop {
            let event = match timeout_at(deadline, self.read_event()).await {
                Ok(result) => result?,
                Err(_) => return Err(self.timeout_error(event_type)),
            };

            if Self::matches(&event, event_type, cid) {
                tracing::debug!(event = %event_type, "matched websocket event");
                return Ok(event.into_inner());
            }
            if event.is(EventType::HealthCheck) {
                continue;
            }
            tracing::debug!(
                received = ?event.event_type(),
                waiting_for = %event_type,
                "buffering non-matching websocket event"
            );
            self.pending.push_back(event);
        }
    }

    fn matches(event: &Event, event_type: EventType, cid: Option<&str>) -> bool {
        event.is(event_type) && cid.map_or(true, |cid| event.cid() == Some(cid))
    }

    fn timeout_error(&self, event_type: EventType) -> Error {
        Error::EventTimeout {
            event_type: event_type.to_string(),
            waited_secs: self.event_timeout.as_secs(),
        }
    }

    /// Read the next event frame, skipping non-text frames.
    async fn read_event(&mut self) -> Result<Event> {
        loop {
            let message = self
                .stream
                .next()
                .await
                .ok_or_else(|| Error::Socket("connection closed".to_string()))??;

            match message {
                Message::Text(text) => {
                    let value: Value = serde_json::from_str(&text)
                        .map_err(|e| Error::Socket(format!("malformed event: {}", e)))?;
                    return Ok(Event(value));
                }
                Message::Close(_) => {
                    return Err(Error::Socket("connection closed by server".to_string()))
                }
                // Pings are answered by tungstenite itself.
                _ => continue,
            }
        }
    }

    /// Close the connection cleanly.
    pub async fn close(mut self) -> Result<()> {
        self.stream.send(Message::Close(None)).await.ok();
        Ok(())
    }
}
