use crate::window::WindowStats;
use crate::AlertRule;
use smokemon_common::types::{AlertKind, ChannelConfig};

/// Fires when the temperature stays strictly under the threshold for the
/// whole window (a stall).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StallRule;

impl AlertRule for StallRule {
    fn kind(&self) -> AlertKind {
        AlertKind::Stall
    }

    fn triggers(&self, stats: &WindowStats, config: &ChannelConfig) -> bool {
        stats.delta < config.alert_threshold && stats.span_minutes <= config.max_window_minutes
    }
}
