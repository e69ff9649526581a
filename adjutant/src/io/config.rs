//! Agent configuration loaded from `config.toml`.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use crate::core::policy::{ExecPolicy, ExecutionMode};

/// Model backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Ollama,
    Gemini,
}

/// Agent configuration (TOML).
///
/// Humans edit this file. Unknown keys are rejected so a typo fails loudly
/// instead of silently relaxing the execution mode.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Backend used for planner and presenter completions.
    pub provider: Provider,

    /// API key for cloud providers. Required when `provider = "gemini"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Model identifier, e.g. `qwen3:4b` or `gemini-2.0-flash`.
    pub model: String,

    /// Sampling temperature, within 0.0..=1.0.
    pub temperature: f32,

    /// Wall-clock bound for one shell command, in seconds.
    pub timeout_seconds: u64,

    /// Execution posture for command authorization.
    pub mode: ExecutionMode,

    /// Base URL of the Ollama server.
    #[serde(default = "default_ollama_base_url")]
    pub ollama_base_url: String,

    /// Stable-mode allowlist override; replaces the built-in set when
    /// non-empty. Ignored in experimental mode.
    #[serde(default)]
    pub allowed_commands: Vec<String>,
}

fn default_ollama_base_url() -> String {
    "http://127.0.0.1:11434".to_string()
}

impl AgentConfig {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.temperature) {
            bail!("temperature must be within 0.0..=1.0");
        }
        if self.timeout_seconds == 0 {
            bail!("timeout_seconds must be > 0");
        }
        Ok(())
    }

    /// Snapshot of the execution-relevant settings for one run.
    pub fn exec_policy(&self) -> ExecPolicy {
        ExecPolicy {
            mode: self.mode,
            allowed_commands: self.allowed_commands.clone(),
            timeout: Duration::from_secs(self.timeout_seconds),
        }
    }
}

/// Load and validate config from a TOML file.
///
/// The file is required: it selects the provider and may carry credentials,
/// so there is no sensible built-in default to fall back to.
pub fn load_config(path: &Path) -> Result<AgentConfig> {
    if !path.exists() {
        bail!("config file not found: {}", path.display());
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let config: AgentConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    config
        .validate()
        .with_context(|| format!("invalid configuration in {}", path.display()))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const VALID: &str = r#"
provider = "ollama"
model = "qwen3:4b"
temperature = 0.2
timeout_seconds = 30
mode = "stable"
"#;

    fn write_and_load(contents: &str) -> Result<AgentConfig> {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("config.toml");
        fs::write(&path, contents).expect("write config");
        load_config(&path)
    }

    #[test]
    fn loads_minimal_config_with_defaults() {
        let config = write_and_load(VALID).expect("load");
        assert_eq!(config.provider, Provider::Ollama);
        assert_eq!(config.mode, ExecutionMode::Stable);
        assert_eq!(config.ollama_base_url, "http://127.0.0.1:11434");
        assert!(config.allowed_commands.is_empty());
        assert_eq!(config.api_key, None);
    }

    #[test]
    fn exec_policy_snapshots_mode_allowlist_and_timeout() {
        let config = write_and_load(
            r#"
provider = "ollama"
model = "qwen3:4b"
temperature = 0.2
timeout_seconds = 7
mode = "experimental"
allowed_commands = ["echo", "date"]
"#,
        )
        .expect("load");
        let policy = config.exec_policy();
        assert_eq!(policy.mode, ExecutionMode::Experimental);
        assert_eq!(policy.allowed_commands, vec!["echo", "date"]);
        assert_eq!(policy.timeout, Duration::from_secs(7));
    }

    #[test]
    fn missing_file_is_an_error() {
        let temp = tempfile::tempdir().expect("tempdir");
        let err = load_config(&temp.path().join("absent.toml")).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn missing_required_field_is_rejected() {
        let err = write_and_load(
            r#"
provider = "ollama"
temperature = 0.2
timeout_seconds = 30
mode = "stable"
"#,
        )
        .unwrap_err();
        assert!(format!("{err:#}").contains("parse"));
    }

    /// Typos must not silently relax the policy.
    #[test]
    fn unknown_field_is_rejected() {
        let err = write_and_load(&format!("{VALID}\nmodee = \"experimental\"\n")).unwrap_err();
        assert!(format!("{err:#}").contains("parse"));
    }

    #[test]
    fn unknown_mode_value_is_rejected() {
        let err = write_and_load(
            r#"
provider = "ollama"
model = "m"
temperature = 0.2
timeout_seconds = 30
mode = "yolo"
"#,
        )
        .unwrap_err();
        assert!(format!("{err:#}").contains("parse"));
    }

    #[test]
    fn out_of_range_temperature_is_rejected() {
        let err = write_and_load(
            r#"
provider = "ollama"
model = "m"
temperature = 1.5
timeout_seconds = 30
mode = "stable"
"#,
        )
        .unwrap_err();
        assert!(format!("{err:#}").contains("temperature"));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let err = write_and_load(
            r#"
provider = "ollama"
model = "m"
temperature = 0.2
timeout_seconds = 0
mode = "stable"
"#,
        )
        .unwrap_err();
        assert!(format!("{err:#}").contains("timeout_seconds"));
    }
}
