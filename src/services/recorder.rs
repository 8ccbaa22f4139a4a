//! Fixture persistence.
//!
//! Each scenario writes into its own subdirectory of the fixtures root, one
//! pretty-printed JSON file per recorded response or event, plus a
//! `manifest.json` listing what a run produced, in order.
//!
//! Responses are persisted verbatim. The consuming mock server rewrites
//! volatile fields (timestamps, ids) itself when replaying.

use std::path::{Path, PathBuf};

use chrono::Utc;
use serde_json::{json, Value};
use tokio::fs;

use crate::error::{Error, Result};

/// Records fixture files for a single scenario run.
pub struct FixtureRecorder {
    dir: PathBuf,
    scenario: String,
    recorded: Vec<String>,
}

impl FixtureRecorder {
    /// Create a recorder writing into `{fixtures_dir}/{scenario}/`.
    pub fn new(fixtures_dir: impl AsRef<Path>, scenario: &str) -> Self {
        Self {
            dir: fixtures_dir.as_ref().join(scenario),
            scenario: scenario.to_string(),
            recorded: Vec::new(),
        }
    }

    /// Directory this recorder writes into.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Fixture names recorded so far, in order.
    pub fn recorded(&self) -> &[String] {
        &self.recorded
    }

    /// Persist one payload as `{name}.json`.
    pub async fn record(&mut self, name: &str, payload: &Value) -> Result<PathBuf> {
        validate_name(name)?;

        fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| Error::Internal(format!("Failed to create fixtures dir: {}", e)))?;

        let path = self.dir.join(format!("{}.json", name));
        let mut bytes = serde_json::to_vec_pretty(payload)?;
        bytes.push(b'\n');
        fs::write(&path, bytes)
            .await
            .map_err(|e| Error::Internal(format!("Failed to write fixture {}: {}", name, e)))?;

        tracing::info!(fixture = %name, path = %path.display(), "recorded fixture");
        self.recorded.push(name.to_string());
        Ok(path)
    }

    /// Write the manifest and consume the recorder.
    pub async fn finish(self) -> Result<PathBuf> {
        let manifest = json!({
            "scenario": self.scenario,
            "generated_at": Utc::now().to_rfc3339(),
            "fixtures": self.recorded,
        });

        let path = self.dir.join("manifest.json");
        let mut bytes = serde_json::to_vec_pretty(&manifest)?;
        bytes.push(b'\n');
        fs::write(&path, bytes)
            .await
            .map_err(|e| Error::Internal(format!("Failed to write manifest: {}", e)))?;

        Ok(path)
    }
}

/// Fixture names become file names; keep them boring.
fn validate_name(name: &str) -> Result<()> {
    if name.is_empty()
        || !name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
    {
        return Err(Error::InvalidInput(format!(
            "Invalid fixture name '{}': expected [a-z0-9_]+",
            name
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_record_writes_pretty_json() {
        let tmp = tempfile::tempdir().unwrap();
        let mut recorder = FixtureRecorder::new(tmp.path(), "messaging");

        let path = recorder
            .record("http_message", &json!({"message": {"id": "m1"}}))
            .await
            .unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.ends_with('\n'));
        assert!(contents.contains("  \"message\""));
        let parsed: Value = serde_json::from_str(&contents).unwrap();
        assert_eq!(parsed["message"]["id"], "m1");
    }

    #[tokio::test]
    async fn test_record_rejects_bad_names() {
        let tmp = tempfile::tempdir().unwrap();
        let mut recorder = FixtureRecorder::new(tmp.path(), "messaging");

        for name in ["", "Http_Message", "../escape", "ws event"] {
            let result = recorder.record(name, &json!({})).await;
            assert!(result.is_err(), "name {:?} should be rejected", name);
        }
    }

    #[tokio::test]
    async fn test_manifest_lists_fixtures_in_order() {
        let tmp = tempfile::tempdir().unwrap();
        let mut recorder = FixtureRecorder::new(tmp.path(), "messaging");

        recorder.record("ws_health_check", &json!({})).await.unwrap();
        recorder.record("http_channel", &json!({})).await.unwrap();
        let manifest_path = recorder.finish().await.unwrap();

        let manifest: Value =
            serde_json::from_str(&std::fs::read_to_string(manifest_path).unwrap()).unwrap();
        assert_eq!(manifest["scenario"], "messaging");
        assert_eq!(
            manifest["fixtures"],
            json!(["ws_health_check", "http_channel"])
        );
        assert!(manifest["generated_at"].is_string());
    }
}
