use anyhow::Context;
use serde::Deserialize;
use smokemon_common::types::ChannelConfig;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = "config/smokemon.toml";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub log_format: LogFormat,
    /// Log file receiving the same records as the console, truncated at startup.
    #[serde(default)]
    pub log_file: Option<PathBuf>,
    #[serde(default)]
    pub replay: ReplayConfig,
    #[serde(default = "default_channels")]
    pub channels: Vec<ChannelConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_format: LogFormat::default(),
            log_file: None,
            replay: ReplayConfig::default(),
            channels: default_channels(),
        }
    }
}

impl AppConfig {
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("invalid config file {}", path.display()))?;
        Ok(config)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReplayConfig {
    #[serde(default = "default_csv_path")]
    pub csv_path: PathBuf,
    /// Pause between CSV rows.
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    /// Publish empty cells as the dropout token instead of skipping them.
    #[serde(default)]
    pub forward_dropouts: bool,
    /// Channel ids for CSV columns 2..n, in order.
    #[serde(default = "default_columns")]
    pub columns: Vec<String>,
    #[serde(default = "default_max_redeliveries")]
    pub max_redeliveries: u32,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            csv_path: default_csv_path(),
            interval_ms: default_interval_ms(),
            forward_dropouts: false,
            columns: default_columns(),
            max_redeliveries: default_max_redeliveries(),
        }
    }
}

pub const SMOKER_CHANNEL: &str = "01-smoker";
pub const FOOD_A_CHANNEL: &str = "02-food-A";
pub const FOOD_B_CHANNEL: &str = "03-food-B";

fn default_channels() -> Vec<ChannelConfig> {
    vec![
        ChannelConfig::rapid_change(SMOKER_CHANNEL, 5, 15.0, 2.5),
        ChannelConfig::stall(FOOD_A_CHANNEL, 20, 1.0, 10.0),
        ChannelConfig::stall(FOOD_B_CHANNEL, 20, 1.0, 10.0),
    ]
}

fn default_csv_path() -> PathBuf {
    PathBuf::from("smoker-temps.csv")
}

fn default_interval_ms() -> u64 {
    30_000
}

fn default_columns() -> Vec<String> {
    vec![
        SMOKER_CHANNEL.to_string(),
        FOOD_A_CHANNEL.to_string(),
        FOOD_B_CHANNEL.to_string(),
    ]
}

fn default_max_redeliveries() -> u32 {
    3
}

#[cfg(test)]
mod tests {
    use super::*;
    use smokemon_common::types::PolicyKind;

    #[test]
    fn empty_file_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.log_format, LogFormat::Text);
        assert_eq!(config.replay.interval_ms, 30_000);
        assert_eq!(config.replay.columns.len(), 3);
        assert_eq!(config.channels.len(), 3);
        assert_eq!(config.channels[0].policy, PolicyKind::RapidChange);
        assert_eq!(config.channels[1].window_capacity, 20);
    }

    #[test]
    fn channels_and_replay_override_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            log_format = "json"

            [replay]
            csv_path = "data/run.csv"
            interval_ms = 0
            forward_dropouts = true
            columns = ["pit"]

            [[channels]]
            channel_id = "pit"
            policy = "rapid_change"
            window_capacity = 4
            alert_threshold = 10.0
            max_window_minutes = 2.0
            "#,
        )
        .unwrap();

        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.replay.csv_path, PathBuf::from("data/run.csv"));
        assert!(config.replay.forward_dropouts);
        assert_eq!(config.replay.max_redeliveries, 3);
        assert_eq!(
            config.channels,
            vec![ChannelConfig::rapid_change("pit", 4, 10.0, 2.0)]
        );
    }

    #[test]
    fn policy_accepts_role_names() {
        let config: AppConfig = toml::from_str(
            r#"
            [[channels]]
            channel_id = "01-smoker"
            policy = "heat_source"
            window_capacity = 5
            alert_threshold = 15.0
            max_window_minutes = 2.5

            [[channels]]
            channel_id = "02-food-A"
            policy = "monitored_item"
            window_capacity = 20
            alert_threshold = 1.0
            max_window_minutes = 10.0
            "#,
        )
        .unwrap();
        assert_eq!(config.channels[0].policy, PolicyKind::RapidChange);
        assert_eq!(config.channels[1].policy, PolicyKind::Stall);
    }

    #[test]
    fn unknown_policy_is_rejected() {
        let result: Result<AppConfig, _> = toml::from_str(
            r#"
            [[channels]]
            channel_id = "pit"
            policy = "threshold"
            window_capacity = 4
            alert_threshold = 10.0
            max_window_minutes = 2.0
            "#,
        );
        assert!(result.is_err());
    }
}
