//! Data views for Wiretap.
//!
//! The tool deliberately has almost no data model: everything the backend
//! returns is treated as an opaque `serde_json::Value` and persisted verbatim.
//! What lives here are the thin views the runner needs to steer by: event
//! type names, a few accessors into event payloads, and the fixture user
//! roster.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Websocket event types the fixture scenarios wait for.
///
/// String values are the vendor protocol's event names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventType {
    #[serde(rename = "health.check")]
    HealthCheck,
    #[serde(rename = "message.new")]
    MessageNew,
    #[serde(rename = "message.updated")]
    MessageUpdated,
    #[serde(rename = "message.deleted")]
    MessageDeleted,
    #[serde(rename = "message.read")]
    MessageRead,
    #[serde(rename = "reaction.new")]
    ReactionNew,
    #[serde(rename = "reaction.deleted")]
    ReactionDeleted,
    #[serde(rename = "typing.start")]
    TypingStart,
    #[serde(rename = "typing.stop")]
    TypingStop,
    #[serde(rename = "member.added")]
    MemberAdded,
    #[serde(rename = "member.removed")]
    MemberRemoved,
    #[serde(rename = "channel.updated")]
    ChannelUpdated,
    #[serde(rename = "channel.deleted")]
    ChannelDeleted,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HealthCheck => "health.check",
            Self::MessageNew => "message.new",
            Self::MessageUpdated => "message.updated",
            Self::MessageDeleted => "message.deleted",
            Self::MessageRead => "message.read",
            Self::ReactionNew => "reaction.new",
            Self::ReactionDeleted => "reaction.deleted",
            Self::TypingStart => "typing.start",
            Self::TypingStop => "typing.stop",
            Self::MemberAdded => "member.added",
            Self::MemberRemoved => "member.removed",
            Self::ChannelUpdated => "channel.updated",
            Self::ChannelDeleted => "channel.deleted",
        }
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A websocket event payload, kept as raw JSON with typed accessors.
#[derive(Debug, Clone)]
pub struct Event(pub Value);

impl Event {
    /// The vendor event type string, e.g. `message.new`.
    pub fn event_type(&self) -> Option<&str> {
        self.0.get("type").and_then(Value::as_str)
    }

    /// Channel cid (`{type}:{id}`) the event belongs to, if any.
    pub fn cid(&self) -> Option<&str> {
        self.0.get("cid").and_then(Value::as_str)
    }

    /// Connection id, present on `health.check` handshake events.
    pub fn connection_id(&self) -> Option<&str> {
        self.0.get("connection_id").and_then(Value::as_str)
    }

    /// Id of the embedded message, for message and reaction events.
    pub fn message_id(&self) -> Option<&str> {
        self.0
            .get("message")
            .and_then(|m| m.get("id"))
            .and_then(Value::as_str)
    }

    pub fn is(&self, event_type: EventType) -> bool {
        self.event_type() == Some(event_type.as_str())
    }

    /// Consume the wrapper, returning the raw payload for recording.
    pub fn into_inner(self) -> Value {
        self.0
    }
}

/// A fixture user identity, upserted before each scenario run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSpec {
    pub id: String,
    pub name: String,
    pub image: String,
}

impl UserSpec {
    fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            image: format!("https://getstream.io/static/users/{}.png", id),
        }
    }
}

/// The roster every scenario runs with.
///
/// The first user is the one the websocket connection authenticates as; the
/// others exist to be added to and removed from channels.
pub fn fixture_users() -> Vec<UserSpec> {
    vec![
        UserSpec::new("luke_skywalker", "Luke Skywalker"),
        UserSpec::new("han_solo", "Han Solo"),
        UserSpec::new("leia_organa", "Leia Organa"),
    ]
}
