use crate::error::{ConfigError, IngestError, Result};
use crate::processor::{IngestOutput, ProcessorStats, StreamProcessor};
use smokemon_common::types::{ChannelConfig, RejectedInput};
use std::collections::HashMap;

/// Routes raw messages to the processor registered for their channel.
///
/// Channels share no state; each is evaluated from its own window.
#[derive(Debug)]
pub struct Engine {
    processors: HashMap<String, StreamProcessor>,
    /// Registration order, for stable reporting.
    order: Vec<String>,
}

impl Engine {
    pub fn new(configs: Vec<ChannelConfig>) -> Result<Self> {
        let mut processors = HashMap::with_capacity(configs.len());
        let mut order = Vec::with_capacity(configs.len());

        for config in configs {
            if processors.contains_key(&config.channel_id) {
                return Err(ConfigError::DuplicateChannel(config.channel_id));
            }
            let processor = StreamProcessor::new(config)?;
            let config = processor.config();
            tracing::debug!(
                channel_id = %config.channel_id,
                policy = %config.policy,
                window_capacity = config.window_capacity,
                alert_threshold = config.alert_threshold,
                max_window_minutes = config.max_window_minutes,
                "Channel registered"
            );
            order.push(config.channel_id.clone());
            processors.insert(config.channel_id.clone(), processor);
        }

        Ok(Self { processors, order })
    }

    pub fn channel_ids(&self) -> &[String] {
        &self.order
    }

    pub fn processor(&self, channel_id: &str) -> Option<&StreamProcessor> {
        self.processors.get(channel_id)
    }

    /// Per-channel counters in registration order.
    pub fn stats(&self) -> Vec<(&str, ProcessorStats)> {
        self.order
            .iter()
            .filter_map(|id| self.processors.get(id).map(|p| (id.as_str(), p.stats())))
            .collect()
    }

    /// Deliver one raw payload to its channel.
    ///
    /// An unknown channel is rejected as malformed and touches no processor.
    pub fn route(&mut self, channel_id: &str, payload: &[u8]) -> Option<IngestOutput> {
        match self.processors.get_mut(channel_id) {
            Some(processor) => processor.ingest(payload),
            None => {
                let err = IngestError::UnknownChannel(channel_id.to_string());
                tracing::debug!(channel_id, error = %err, "Message for unregistered channel");
                Some(IngestOutput::Rejected(RejectedInput {
                    channel_id: channel_id.to_string(),
                    raw_payload: String::from_utf8_lossy(payload).into_owned(),
                    reason: err.reason(),
                    detail: err.to_string(),
                }))
            }
        }
    }
}

/// Check a channel config before a processor is built for it.
pub fn validate(config: &ChannelConfig) -> Result<()> {
    let channel_id = &config.channel_id;
    if channel_id.trim().is_empty() {
        return Err(ConfigError::EmptyChannelId);
    }
    if config.window_capacity < 2 {
        return Err(ConfigError::WindowTooSmall {
            channel_id: channel_id.clone(),
            capacity: config.window_capacity,
        });
    }
    if !config.alert_threshold.is_finite() || config.alert_threshold < 0.0 {
        return Err(ConfigError::InvalidThreshold {
            channel_id: channel_id.clone(),
            value: config.alert_threshold,
        });
    }
    if !config.max_window_minutes.is_finite() || config.max_window_minutes <= 0.0 {
        return Err(ConfigError::InvalidWindowMinutes {
            channel_id: channel_id.clone(),
            value: config.max_window_minutes,
        });
    }
    Ok(())
}
