use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One timestamped temperature sample. `value == None` is a sensor dropout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub timestamp: DateTime<Utc>,
    pub value: Option<f64>,
}

impl Reading {
    pub fn new(timestamp: DateTime<Utc>, value: Option<f64>) -> Self {
        Self { timestamp, value }
    }

    pub fn dropout(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            value: None,
        }
    }
}

/// Which alert rule a channel is evaluated with.
///
/// # Examples
///
/// ```
/// use smokemon_common::types::PolicyKind;
///
/// let kind: PolicyKind = "stall".parse().unwrap();
/// assert_eq!(kind, PolicyKind::Stall);
/// assert_eq!(PolicyKind::RapidChange.to_string(), "rapid_change");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum PolicyKind {
    /// Heat-source channel: alert on a large change inside a short window.
    RapidChange,
    /// Monitored-item channel: alert on a lack of change over a longer window.
    Stall,
}

impl std::fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PolicyKind::RapidChange => write!(f, "rapid_change"),
            PolicyKind::Stall => write!(f, "stall"),
        }
    }
}

impl std::str::FromStr for PolicyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "rapid_change" | "rapid-change" | "heat_source" => Ok(PolicyKind::RapidChange),
            "stall" | "monitored_item" => Ok(PolicyKind::Stall),
            _ => Err(format!("unknown alert policy: {s}")),
        }
    }
}

impl TryFrom<String> for PolicyKind {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Static per-channel settings, fixed once the engine is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelConfig {
    pub channel_id: String,
    pub policy: PolicyKind,
    /// Number of readings (dropouts included) held by the channel window.
    pub window_capacity: usize,
    /// Absolute temperature difference, in degrees.
    pub alert_threshold: f64,
    pub max_window_minutes: f64,
}

impl ChannelConfig {
    pub fn rapid_change(
        channel_id: impl Into<String>,
        window_capacity: usize,
        alert_threshold: f64,
        max_window_minutes: f64,
    ) -> Self {
        Self {
            channel_id: channel_id.into(),
            policy: PolicyKind::RapidChange,
            window_capacity,
            alert_threshold,
            max_window_minutes,
        }
    }

    pub fn stall(
        channel_id: impl Into<String>,
        window_capacity: usize,
        alert_threshold: f64,
        max_window_minutes: f64,
    ) -> Self {
        Self {
            channel_id: channel_id.into(),
            policy: PolicyKind::Stall,
            window_capacity,
            alert_threshold,
            max_window_minutes,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    RapidChange,
    Stall,
}

impl std::fmt::Display for AlertKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AlertKind::RapidChange => write!(f, "rapid_change"),
            AlertKind::Stall => write!(f, "stall"),
        }
    }
}

/// An immutable alert record produced by a channel's policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub channel_id: String,
    pub kind: AlertKind,
    /// `|first_valid - last_valid|` over the window, in degrees.
    pub magnitude: f64,
    pub elapsed_minutes: f64,
    /// Timestamp of the newest reading in the window when the alert fired.
    pub triggered_at: DateTime<Utc>,
    /// Threshold the magnitude was compared against.
    pub threshold: f64,
}

impl std::fmt::Display for Alert {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            AlertKind::RapidChange => write!(
                f,
                "{} alert: temperature changed by {:.1}° (>= {:.1}°) in {:.1} minutes",
                self.channel_id, self.magnitude, self.threshold, self.elapsed_minutes
            ),
            AlertKind::Stall => write!(
                f,
                "{} stall: temperature changed by only {:.1}° (< {:.1}°) in {:.1} minutes",
                self.channel_id, self.magnitude, self.threshold, self.elapsed_minutes
            ),
        }
    }
}

/// Why an inbound message was not turned into a reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    /// Wrong field count, non UTF-8 payload or unknown channel.
    MalformedFormat,
    UnparsableTimestamp,
    UnparsableValue,
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RejectReason::MalformedFormat => write!(f, "malformed_format"),
            RejectReason::UnparsableTimestamp => write!(f, "unparsable_timestamp"),
            RejectReason::UnparsableValue => write!(f, "unparsable_value"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RejectedInput {
    pub channel_id: String,
    /// The payload as received, lossily decoded for diagnostics.
    pub raw_payload: String,
    pub reason: RejectReason,
    /// Human-readable description of the failure.
    pub detail: String,
}
