//! Shared test helpers: a wiremock REST backend and a scripted websocket
//! server standing in for the chat backend.

#![allow(dead_code)]

use futures::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio_tungstenite::tungstenite::Message;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

use wiretap::config::ApiConfig;

pub const API_KEY: &str = "key-123";
pub const API_SECRET: &str = "fixture-secret";

/// Config pointing at the test doubles instead of the real backend.
pub fn test_api_config(rest_url: &str, ws_url: &str) -> ApiConfig {
    ApiConfig {
        base_url: rest_url.to_string(),
        ws_url: ws_url.to_string(),
        api_key: API_KEY.to_string(),
        api_secret: API_SECRET.to_string(),
        channel_type: "messaging".to_string(),
        request_timeout_secs: 5,
        event_timeout_secs: 2,
    }
}

// ============================================================================
// Canned payloads
// ============================================================================

pub fn health_check_event(connection_id: &str) -> Value {
    json!({
        "type": "health.check",
        "connection_id": connection_id,
        "created_at": "2022-06-09T10:21:40Z",
        "me": { "id": "luke_skywalker", "name": "Luke Skywalker" },
    })
}

pub fn channel_payload(cid: &str) -> Value {
    let id = cid.split(':').nth(1).unwrap_or(cid);
    json!({
        "channel": {
            "id": id,
            "type": "messaging",
            "cid": cid,
            "created_by": { "id": "luke_skywalker" },
            "config": { "typing_events": true, "reactions": true },
        },
        "members": [
            { "user_id": "luke_skywalker", "user": { "id": "luke_skywalker" } },
            { "user_id": "han_solo", "user": { "id": "han_solo" } },
        ],
        "messages": [],
        "duration": "1.21ms",
    })
}

pub fn message_payload(message_id: &str, text: &str) -> Value {
    json!({
        "message": {
            "id": message_id,
            "text": text,
            "type": "regular",
            "user": { "id": "luke_skywalker" },
            "created_at": "2022-06-09T10:21:40Z",
        },
        "duration": "0.84ms",
    })
}

/// A channel event as the backend pushes it over the websocket.
pub fn channel_event(event_type: &str, cid: &str) -> Value {
    json!({
        "type": event_type,
        "cid": cid,
        "channel_id": cid.split(':').nth(1).unwrap_or(cid),
        "channel_type": "messaging",
        "user": { "id": "luke_skywalker" },
        "created_at": "2022-06-09T10:21:41Z",
    })
}

pub fn message_event(event_type: &str, cid: &str, message_id: &str) -> Value {
    let mut event = channel_event(event_type, cid);
    event["message"] = json!({
        "id": message_id,
        "text": "Hello from the fixture run",
        "type": "regular",
        "user": { "id": "luke_skywalker" },
    });
    event
}

// ============================================================================
// REST backend
// ============================================================================

/// Mount responders for the whole REST surface the scenarios drive.
///
/// Matchers are disjoint (method + anchored path regex), so mount order
/// doesn't matter.
pub async fn mount_chat_backend(server: &MockServer, cid: &str) {
    let respond = |body: Value| ResponseTemplate::new(200).set_body_json(body);

    Mock::given(method("POST"))
        .and(path("/users"))
        .respond_with(respond(json!({
            "users": {
                "luke_skywalker": { "id": "luke_skywalker", "name": "Luke Skywalker" },
                "han_solo": { "id": "han_solo", "name": "Han Solo" },
                "leia_organa": { "id": "leia_organa", "name": "Leia Organa" },
            },
            "duration": "2.45ms",
        })))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path_regex(r"^/channels/[^/]+/[^/]+/query$"))
        .respond_with(respond(channel_payload(cid)))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/channels"))
        .respond_with(respond(json!({
            "channels": [channel_payload(cid)],
            "duration": "1.92ms",
        })))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path_regex(r"^/channels/[^/]+/[^/]+/message$"))
        .respond_with(respond(message_payload("msg-fixture", "Hello from the fixture run")))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path_regex(r"^/channels/[^/]+/[^/]+/event$"))
        .respond_with(respond(json!({
            "event": { "type": "typing.start", "user": { "id": "luke_skywalker" } },
            "duration": "0.41ms",
        })))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path_regex(r"^/channels/[^/]+/[^/]+/read$"))
        .respond_with(respond(json!({
            "event": { "type": "message.read", "user": { "id": "luke_skywalker" } },
            "duration": "0.38ms",
        })))
        .mount(server)
        .await;

    // Channel update (members, data) and deletion share a path.
    Mock::given(method("POST"))
        .and(path_regex(r"^/channels/[^/]+/[^/]+$"))
        .respond_with(respond(channel_payload(cid)))
        .mount(server)
        .await;

    Mock::given(method("DELETE"))
        .and(path_regex(r"^/channels/[^/]+/[^/]+$"))
        .respond_with(respond(channel_payload(cid)))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path_regex(r"^/messages/[^/]+/replies$"))
        .respond_with(respond(json!({
            "messages": [message_payload("reply-fixture", "A threaded reply")["message"].clone()],
            "duration": "0.77ms",
        })))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path_regex(r"^/messages/[^/]+/reaction$"))
        .respond_with(respond(json!({
            "message": message_payload("msg-fixture", "Hello from the fixture run")["message"].clone(),
            "reaction": { "type": "love", "user": { "id": "luke_skywalker" } },
            "duration": "0.52ms",
        })))
        .mount(server)
        .await;

    Mock::given(method("DELETE"))
        .and(path_regex(r"^/messages/[^/]+/reaction/[^/]+$"))
        .respond_with(respond(json!({
            "message": message_payload("msg-fixture", "Hello from the fixture run")["message"].clone(),
            "reaction": { "type": "love", "user": { "id": "luke_skywalker" } },
            "duration": "0.49ms",
        })))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path_regex(r"^/messages/[^/]+/action$"))
        .respond_with(respond(message_payload("msg-fixture", "/giphy hello")))
        .mount(server)
        .await;

    // Message update and deletion share a path.
    Mock::given(method("POST"))
        .and(path_regex(r"^/messages/[^/]+$"))
        .respond_with(respond(message_payload(
            "msg-fixture",
            "Hello from the fixture run (edited)",
        )))
        .mount(server)
        .await;

    Mock::given(method("DELETE"))
        .and(path_regex(r"^/messages/[^/]+$"))
        .respond_with(respond(message_payload("msg-fixture", "")))
        .mount(server)
        .await;
}

// ============================================================================
// Websocket backend
// ============================================================================

/// Spawn a one-connection websocket server that sends the scripted events in
/// order, then holds the connection open until the client drops it.
///
/// Returns the `ws://` base URL to put in the config.
pub async fn spawn_ws_server(events: Vec<Value>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.expect("accept websocket client");
        let mut ws = tokio_tungstenite::accept_async(stream)
            .await
            .expect("websocket handshake");

        for event in events {
            ws.send(Message::Text(event.to_string()))
                .await
                .expect("send scripted event");
        }

        // Drain until the client closes.
        while let Some(message) = ws.next().await {
            if message.is_err() {
                break;
            }
        }
    });

    format!("ws://{}", addr)
}

/// The full scripted event sequence a messaging scenario run consumes.
pub fn messaging_events(cid: &str) -> Vec<Value> {
    vec![
        health_check_event("conn-1"),
        message_event("message.new", cid, "msg-fixture"),
        message_event("message.updated", cid, "msg-fixture"),
        message_event("reaction.new", cid, "msg-fixture"),
        message_event("reaction.deleted", cid, "msg-fixture"),
        channel_event("typing.start", cid),
        channel_event("member.added", cid),
        channel_event("member.removed", cid),
        channel_event("channel.updated", cid),
        message_event("message.deleted", cid, "msg-fixture"),
    ]
}
