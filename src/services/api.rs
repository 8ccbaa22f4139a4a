//! REST client for the vendor chat API.
//!
//! Covers the scripted surface the fixture scenarios drive:
//! - User upserts
//! - Channel create/query, list, update, delete
//! - Message lifecycle (send, update, delete, replies)
//! - Reactions, typing events, read state, message actions
//!
//! Responses are returned as opaque JSON; the whole point of the tool is to
//! persist them byte-faithfully, so nothing here deserializes into domain
//! types.

use std::time::Duration;

use reqwest::{header, Client, Method};
use serde_json::{json, Value};
use url::Url;

use crate::config::ApiConfig;
use crate::error::{Error, Result};
use crate::models::UserSpec;

/// Service for vendor chat REST API operations.
#[derive(Clone)]
pub struct ChatApiService {
    client: Client,
    base_url: String,
    api_key: String,
}

impl ChatApiService {
    /// Create a new chat API service.
    pub fn new(config: &ApiConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(concat!("wiretap/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
        }
    }

    /// Build headers with user authentication.
    fn build_headers(&self, token: &str) -> header::HeaderMap {
        let mut headers = header::HeaderMap::new();
        headers.insert(header::AUTHORIZATION, token.parse().unwrap());
        headers.insert("Stream-Auth-Type", "jwt".parse().unwrap());
        headers.insert(
            "X-Stream-Client",
            concat!("wiretap-", env!("CARGO_PKG_VERSION")).parse().unwrap(),
        );
        headers
    }

    /// Build a request URL with the api key and extra query parameters.
    fn build_url(&self, path: &str, query: &[(&str, &str)]) -> Result<Url> {
        let mut url = Url::parse(&format!("{}/{}", self.base_url, path))?;
        url.query_pairs_mut().append_pair("api_key", &self.api_key);
        for (key, value) in query {
            url.query_pairs_mut().append_pair(key, value);
        }
        Ok(url)
    }

    /// Send a request and pass the JSON response through unparsed.
    async fn execute(
        &self,
        method: Method,
        token: &str,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&Value>,
    ) -> Result<Value> {
        let url = self.build_url(path, query)?;

        let mut request = self
            .client
            .request(method, url)
            .headers(self.build_headers(token));
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Api {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json()
            .await
            .map_err(|e| Error::Request(format!("Failed to parse response: {}", e)))
    }

    /// Upsert the fixture users.
    pub async fn update_users(&self, token: &str, users: &[UserSpec]) -> Result<Value> {
        let mut map = serde_json::Map::new();
        for user in users {
            map.insert(
                user.id.clone(),
                json!({"id": user.id, "name": user.name, "image": user.image}),
            );
        }
        let body = json!({ "users": map });

        self.execute(Method::POST, token, "users", &[], Some(&body))
            .await
    }

    /// Create or fetch a channel, subscribing the connection as a watcher.
    pub async fn query_channel(
        &self,
        token: &str,
        connection_id: &str,
        channel_type: &str,
        channel_id: &str,
        members: &[String],
    ) -> Result<Value> {
        let path = format!("channels/{}/{}/query", channel_type, channel_id);
        let body = json!({
            "data": { "members": members },
            "state": true,
            "watch": true,
            "presence": false,
            "messages": { "limit": 25 },
        });

        self.execute(
            Method::POST,
            token,
            &path,
            &[("connection_id", connection_id)],
            Some(&body),
        )
        .await
    }

    /// List channels matching a filter.
    pub async fn list_channels(
        &self,
        token: &str,
        connection_id: &str,
        filter: &Value,
    ) -> Result<Value> {
        let payload = json!({
            "filter_conditions": filter,
            "state": true,
            "watch": false,
            "limit": 20,
        });
        let payload = serde_json::to_string(&payload)?;

        self.execute(
            Method::GET,
            token,
            "channels",
            &[
                ("connection_id", connection_id),
                ("payload", payload.as_str()),
            ],
            None,
        )
        .await
    }

    /// Send a message to a channel. Used for thread replies too, via a
    /// `parent_id` field in the message body.
    pub async fn send_message(
        &self,
        token: &str,
        channel_type: &str,
        channel_id: &str,
        message: &Value,
    ) -> Result<Value> {
        let path = format!("channels/{}/{}/message", channel_type, channel_id);
        let body = json!({ "message": message });

        self.execute(Method::POST, token, &path, &[], Some(&body))
            .await
    }

    /// Update an existing message.
    pub async fn update_message(
        &self,
        token: &str,
        message_id: &str,
        message: &Value,
    ) -> Result<Value> {
        let path = format!("messages/{}", message_id);
        let body = json!({ "message": message });

        self.execute(Method::POST, token, &path, &[], Some(&body))
            .await
    }

    /// Delete a message.
    pub async fn delete_message(&self, token: &str, message_id: &str) -> Result<Value> {
        let path = format!("messages/{}", message_id);

        self.execute(Method::DELETE, token, &path, &[], None).await
    }

    /// Fetch the replies of a thread.
    pub async fn get_replies(&self, token: &str, parent_id: &str, limit: u32) -> Result<Value> {
        let path = format!("messages/{}/replies", parent_id);
        let payload = serde_json::to_string(&json!({ "limit": limit }))?;

        self.execute(Method::GET, token, &path, &[("payload", payload.as_str())], None)
            .await
    }

    /// Add a reaction to a message.
    pub async fn send_reaction(
        &self,
        token: &str,
        message_id: &str,
        reaction_type: &str,
    ) -> Result<Value> {
        let path = format!("messages/{}/reaction", message_id);
        let body = json!({ "reaction": { "type": reaction_type } });

        self.execute(Method::POST, token, &path, &[], Some(&body))
            .await
    }

    /// Remove a reaction from a message.
    pub async fn delete_reaction(
        &self,
        token: &str,
        message_id: &str,
        reaction_type: &str,
    ) -> Result<Value> {
        let path = format!("messages/{}/reaction/{}", message_id, reaction_type);

        self.execute(Method::DELETE, token, &path, &[], None).await
    }

    /// Resolve an ephemeral message's attachment action (giphy send/cancel).
    pub async fn send_action(
        &self,
        token: &str,
        message_id: &str,
        channel_id: &str,
        form_data: &Value,
    ) -> Result<Value> {
        let path = format!("messages/{}/action", message_id);
        let body = json!({
            "message_id": message_id,
            "channel_id": channel_id,
            "form_data": form_data,
        });

        self.execute(Method::POST, token, &path, &[], Some(&body))
            .await
    }

    /// Send a channel event, e.g. typing start/stop.
    pub async fn send_event(
        &self,
        token: &str,
        channel_type: &str,
        channel_id: &str,
        event_type: &str,
    ) -> Result<Value> {
        let path = format!("channels/{}/{}/event", channel_type, channel_id);
        let body = json!({ "event": { "type": event_type } });

        self.execute(Method::POST, token, &path, &[], Some(&body))
            .await
    }

    /// Mark the channel as read.
    pub async fn mark_read(
        &self,
        token: &str,
        channel_type: &str,
        channel_id: &str,
    ) -> Result<Value> {
        let path = format!("channels/{}/{}/read", channel_type, channel_id);
        let body = json!({});

        self.execute(Method::POST, token, &path, &[], Some(&body))
            .await
    }

    /// Add members to a channel.
    pub async fn add_members(
        &self,
        token: &str,
        channel_type: &str,
        channel_id: &str,
        members: &[String],
    ) -> Result<Value> {
        let path = format!("channels/{}/{}", channel_type, channel_id);
        let body = json!({ "add_members": members });

        self.execute(Method::POST, token, &path, &[], Some(&body))
            .await
    }

    /// Remove members from a channel.
    pub async fn remove_members(
        &self,
        token: &str,
        channel_type: &str,
        channel_id: &str,
        members: &[String],
    ) -> Result<Value> {
        let path = format!("channels/{}/{}", channel_type, channel_id);
        let body = json!({ "remove_members": members });

        self.execute(Method::POST, token, &path, &[], Some(&body))
            .await
    }

    /// Update channel data (name, custom fields).
    pub async fn update_channel(
        &self,
        token: &str,
        channel_type: &str,
        channel_id: &str,
        data: &Value,
    ) -> Result<Value> {
        let path = format!("channels/{}/{}", channel_type, channel_id);
        let body = json!({ "data": data });

        self.execute(Method::POST, token, &path, &[], Some(&body))
            .await
    }

    /// Delete a channel.
    pub async fn delete_channel(
        &self,
        token: &str,
        channel_type: &str,
        channel_id: &str,
    ) -> Result<Value> {
        let path = format!("channels/{}/{}", channel_type, channel_id);

        self.execute(Method::DELETE, token, &path, &[], None).await
    }
}
