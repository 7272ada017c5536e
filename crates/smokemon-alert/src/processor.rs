use crate::engine::validate;
use crate::error::{IngestError, Result};
use crate::rules::AlertPolicy;
use crate::window::ChannelWindow;
use crate::Evaluation;
use smokemon_common::time::parse_timestamp;
use smokemon_common::types::{Alert, ChannelConfig, Reading, RejectedInput};

/// Case-insensitive payload token for a sensor dropout.
pub const DROPOUT_TOKEN: &str = "none";

/// Result of an ingest that produced something for the output streams.
#[derive(Debug, Clone, PartialEq)]
pub enum IngestOutput {
    Alert(Alert),
    Rejected(RejectedInput),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessorState {
    /// Window not yet full.
    Collecting,
    /// Window full; every reading is evaluated from here on.
    Evaluating,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessorStats {
    pub accepted: u64,
    pub rejected: u64,
    pub alerts: u64,
    pub insufficient_data: u64,
}

/// Parse a `timestamp,value` payload into a reading.
pub fn parse_payload(payload: &[u8]) -> std::result::Result<Reading, IngestError> {
    let text = std::str::from_utf8(payload).map_err(|_| IngestError::InvalidUtf8)?;
    let fields: Vec<&str> = text.trim().split(',').collect();
    let [timestamp_str, value_str] = fields.as_slice() else {
        return Err(IngestError::FieldCount(fields.len()));
    };

    let timestamp = parse_timestamp(timestamp_str)
        .ok_or_else(|| IngestError::Timestamp(timestamp_str.trim().to_string()))?;

    let value_str = value_str.trim();
    if value_str.eq_ignore_ascii_case(DROPOUT_TOKEN) {
        return Ok(Reading::dropout(timestamp));
    }

    match value_str.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(Reading::new(timestamp, Some(value))),
        _ => Err(IngestError::Value(value_str.to_string())),
    }
}

/// Owns one channel's window and turns payloads into alerts.
///
/// Not shared between threads: callers must serialize `ingest` per channel.
#[derive(Debug)]
pub struct StreamProcessor {
    config: ChannelConfig,
    policy: AlertPolicy,
    window: ChannelWindow,
    stats: ProcessorStats,
}

impl StreamProcessor {
    /// Build a processor for a validated channel config.
    pub fn new(config: ChannelConfig) -> Result<Self> {
        validate(&config)?;
        let policy = AlertPolicy::for_kind(config.policy);
        let window = ChannelWindow::new(config.window_capacity);
        Ok(Self {
            config,
            policy,
            window,
            stats: ProcessorStats::default(),
        })
    }

    pub fn config(&self) -> &ChannelConfig {
        &self.config
    }

    pub fn window(&self) -> &ChannelWindow {
        &self.window
    }

    pub fn stats(&self) -> ProcessorStats {
        self.stats
    }

    pub fn state(&self) -> ProcessorState {
        if self.window.is_full() {
            ProcessorState::Evaluating
        } else {
            ProcessorState::Collecting
        }
    }

    /// Parse and ingest one raw payload.
    ///
    /// Returns `None` while collecting or when the policy does not fire.
    /// A rejected payload leaves the window untouched.
    pub fn ingest(&mut self, payload: &[u8]) -> Option<IngestOutput> {
        match parse_payload(payload) {
            Ok(reading) => self.ingest_reading(reading).map(IngestOutput::Alert),
            Err(err) => Some(IngestOutput::Rejected(self.reject(payload, &err))),
        }
    }

    /// Push an already parsed reading and evaluate the window if full.
    pub fn ingest_reading(&mut self, reading: Reading) -> Option<Alert> {
        self.window.push(reading);
        self.stats.accepted += 1;

        tracing::debug!(
            channel_id = %self.config.channel_id,
            timestamp = %reading.timestamp,
            temperature = ?reading.value,
            window_len = self.window.len(),
            "Reading received"
        );

        if self.state() == ProcessorState::Collecting {
            return None;
        }

        match self.policy.evaluate(&self.config, &self.window) {
            Evaluation::Fired(alert) => {
                self.stats.alerts += 1;
                Some(alert)
            }
            Evaluation::InsufficientData { valid } => {
                self.stats.insufficient_data += 1;
                tracing::warn!(
                    channel_id = %self.config.channel_id,
                    valid,
                    capacity = self.window.capacity(),
                    "Insufficient valid temperatures in window"
                );
                None
            }
            Evaluation::Quiet {
                delta,
                elapsed_minutes,
            } => {
                tracing::trace!(
                    channel_id = %self.config.channel_id,
                    delta,
                    elapsed_minutes,
                    "Window evaluated, no alert"
                );
                None
            }
            Evaluation::Collecting => None,
        }
    }

    fn reject(&mut self, payload: &[u8], err: &IngestError) -> RejectedInput {
        self.stats.rejected += 1;
        tracing::debug!(
            channel_id = %self.config.channel_id,
            reason = %err.reason(),
            error = %err,
            "Payload rejected"
        );
        RejectedInput {
            channel_id: self.config.channel_id.clone(),
            raw_payload: String::from_utf8_lossy(payload).into_owned(),
            reason: err.reason(),
            detail: err.to_string(),
        }
    }
}
