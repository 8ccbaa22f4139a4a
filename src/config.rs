//! Configuration management for Wiretap.
//!
//! Loads configuration from environment variables (with .env support):
//! - Chat backend endpoints and credentials
//! - Fixture output location
//! - Request and event-wait timeouts

use std::env;
use std::sync::OnceLock;

use crate::error::{Error, Result};

/// Global configuration instance
static CONFIG: OnceLock<Config> = OnceLock::new();

/// Get the global configuration
pub fn config() -> &'static Config {
    CONFIG.get_or_init(Config::from_env)
}

/// Initialize configuration (call once at startup)
pub fn init() -> &'static Config {
    config()
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api: ApiConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL for REST calls.
    pub base_url: String,
    /// Base URL for the websocket event stream.
    pub ws_url: String,
    /// Application API key, sent as a query parameter on every call.
    pub api_key: String,
    /// Application secret used to sign user tokens.
    pub api_secret: String,
    /// Channel type the fixture channels are created under.
    pub channel_type: String,
    pub request_timeout_secs: u64,
    pub event_timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Root directory fixture scenarios write into.
    pub fixtures_dir: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            api: ApiConfig {
                base_url: env_or("CHAT_API_URL", "https://chat.stream-io-api.com"),
                ws_url: env_or("CHAT_WS_URL", "wss://chat.stream-io-api.com"),
                api_key: env_or("CHAT_API_KEY", ""),
                api_secret: env_or("CHAT_API_SECRET", ""),
                channel_type: env_or("CHANNEL_TYPE", "messaging"),
                request_timeout_secs: env_or("REQUEST_TIMEOUT_SECS", "30")
                    .parse()
                    .expect("Invalid REQUEST_TIMEOUT_SECS"),
                event_timeout_secs: env_or("EVENT_TIMEOUT_SECS", "10")
                    .parse()
                    .expect("Invalid EVENT_TIMEOUT_SECS"),
            },
            output: OutputConfig {
                fixtures_dir: env_or("FIXTURES_DIR", "./fixtures"),
            },
        }
    }
}

impl ApiConfig {
    /// Check that the credentials needed to talk to the backend are present.
    ///
    /// Called at command dispatch rather than load so commands that never
    /// touch the network (`list`) work without an environment.
    pub fn require_credentials(&self) -> Result<()> {
        if self.api_key.is_empty() {
            return Err(Error::Config("CHAT_API_KEY is not set".to_string()));
        }
        if self.api_secret.is_empty() {
            return Err(Error::Config("CHAT_API_SECRET is not set".to_string()));
        }
        Ok(())
    }
}

/// Get an environment variable or a default value.
fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}
