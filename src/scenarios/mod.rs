//! Fixture scenarios.
//!
//! A scenario is a scripted, strictly sequential drive of the chat backend:
//! perform a REST call, await the websocket event it triggers, record both,
//! move on. Shared setup (token, websocket handshake, user upserts, channel
//! creation) and teardown (channel deletion, manifest) live in the runner;
//! the scenario bodies are the parts that differ.

mod ephemeral;
mod messaging;

use std::path::PathBuf;

use serde::Serialize;
use serde_json::Value;

use crate::config::ApiConfig;
use crate::error::{Error, Result};
use crate::models::{fixture_users, EventType, UserSpec};
use crate::services::{ChatApiService, EventSocket, FixtureRecorder, TokenService};

/// The available fixture scenarios.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scenario {
    /// Channel, message, reaction, member, typing and read fixtures.
    Messaging,
    /// Slash-command ephemeral message and message action fixtures.
    Ephemeral,
}

impl Scenario {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Messaging => "messaging",
            Self::Ephemeral => "ephemeral",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Messaging => {
                "channel lifecycle, messages, reactions, members, typing and read state"
            }
            Self::Ephemeral => "slash-command ephemeral messages and attachment actions",
        }
    }

    pub fn all() -> &'static [Scenario] {
        &[Self::Messaging, Self::Ephemeral]
    }
}

impl std::fmt::Display for Scenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Scenario {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "messaging" => Ok(Self::Messaging),
            "ephemeral" => Ok(Self::Ephemeral),
            _ => Err(Error::InvalidInput(format!(
                "Unknown scenario '{}': expected one of messaging, ephemeral",
                s
            ))),
        }
    }
}

/// Everything a single scenario run needs.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub api: ApiConfig,
    pub fixtures_dir: String,
    /// Pin the channel id instead of generating one per run.
    pub channel_id: Option<String>,
}

/// What a scenario run produced.
#[derive(Debug, Serialize)]
pub struct RunSummary {
    pub scenario: String,
    pub dir: PathBuf,
    pub fixtures: Vec<String>,
}

/// Shared state threaded through a scenario body.
pub struct ScenarioContext {
    pub api: ChatApiService,
    pub socket: EventSocket,
    pub recorder: FixtureRecorder,
    pub token: String,
    pub users: Vec<UserSpec>,
    pub channel_type: String,
    pub channel_id: String,
    pub cid: String,
}

impl ScenarioContext {
    /// Record a REST response under the given fixture name.
    pub async fn record(&mut self, name: &str, payload: &Value) -> Result<()> {
        self.recorder.record(name, payload).await?;
        Ok(())
    }

    /// Await the websocket event for the last action on this channel and
    /// record it.
    pub async fn record_event(&mut self, name: &str, event_type: EventType) -> Result<()> {
        let event = self.socket.wait_for(event_type, Some(&self.cid)).await?;
        self.recorder.record(name, &event).await?;
        Ok(())
    }
}

/// Run one scenario end to end.
pub async fn run(scenario: Scenario, config: &RunConfig) -> Result<RunSummary> {
    tracing::info!(scenario = %scenario, "starting fixture run");
    config.api.require_credentials()?;

    let users = fixture_users();
    let primary = users[0].clone();

    let tokens = TokenService::new(&config.api.api_secret);
    let token = tokens.user_token(&primary.id)?;

    let api = ChatApiService::new(&config.api);
    let (socket, hello) = EventSocket::connect(&config.api, &primary, &token).await?;

    let channel_id = config
        .channel_id
        .clone()
        .unwrap_or_else(|| format!("fixtures-{}", short_id()));
    let channel_type = config.api.channel_type.clone();
    let cid = format!("{}:{}", channel_type, channel_id);

    let mut ctx = ScenarioContext {
        api,
        socket,
        recorder: FixtureRecorder::new(&config.fixtures_dir, scenario.name()),
        token,
        users,
        channel_type,
        channel_id,
        cid,
    };

    ctx.recorder.record("ws_health_check", &hello).await?;

    // Shared setup: users exist, channel exists and is watched.
    tracing::info!("upserting fixture users");
    let users_response = ctx.api.update_users(&ctx.token, &ctx.users).await?;
    ctx.record("http_users", &users_response).await?;

    tracing::info!(cid = %ctx.cid, "creating fixture channel");
    let connection_id = ctx.socket.connection_id().to_string();
    let member_ids: Vec<String> = ctx.users.iter().map(|u| u.id.clone()).take(2).collect();
    let channel = ctx
        .api
        .query_channel(
            &ctx.token,
            &connection_id,
            &ctx.channel_type,
            &ctx.channel_id,
            &member_ids,
        )
        .await?;
    ctx.record("http_channel", &channel).await?;

    match scenario {
        Scenario::Messaging => messaging::run(&mut ctx).await?,
        Scenario::Ephemeral => ephemeral::run(&mut ctx).await?,
    }

    // Shared teardown.
    tracing::info!(cid = %ctx.cid, "deleting fixture channel");
    let deleted = ctx
        .api
        .delete_channel(&ctx.token, &ctx.channel_type, &ctx.channel_id)
        .await?;
    ctx.record("http_channel_deleted", &deleted).await?;

    let ScenarioContext {
        socket, recorder, ..
    } = ctx;
    socket.close().await?;

    let fixtures = recorder.recorded().to_vec();
    let dir = recorder.dir().to_path_buf();
    recorder.finish().await?;

    tracing::info!(
        scenario = %scenario,
        fixtures = fixtures.len(),
        dir = %dir.display(),
        "fixture run complete"
    );

    Ok(RunSummary {
        scenario: scenario.name().to_string(),
        dir,
        fixtures,
    })
}

/// Short unique suffix for per-run channel ids.
fn short_id() -> String {
    let id = uuid::Uuid::new_v4().simple().to_string();
    id[..8].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scenario_from_str() {
        assert_eq!("messaging".parse::<Scenario>().unwrap(), Scenario::Messaging);
        assert_eq!("ephemeral".parse::<Scenario>().unwrap(), Scenario::Ephemeral);
        assert!("presence".parse::<Scenario>().is_err());
    }

    #[test]
    fn test_scenario_names_are_valid_fixture_dirs() {
        for scenario in Scenario::all() {
            assert!(scenario
                .name()
                .chars()
                .all(|c| c.is_ascii_lowercase() || c == '_'));
        }
    }

    #[test]
    fn test_short_id_length() {
        let id = short_id();
        assert_eq!(id.len(), 8);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
