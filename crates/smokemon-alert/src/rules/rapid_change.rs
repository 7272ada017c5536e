use crate::window::WindowStats;
use crate::AlertRule;
use smokemon_common::types::{AlertKind, ChannelConfig};

/// Fires on a large temperature change that happened quickly.
///
/// A large drift spread over more than `max_window_minutes` is not an anomaly,
/// so the window's real elapsed time gates the alert. The threshold is
/// inclusive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RapidChangeRule;

impl AlertRule for RapidChangeRule {
    fn kind(&self) -> AlertKind {
        AlertKind::RapidChange
    }

    fn triggers(&self, stats: &WindowStats, config: &ChannelConfig) -> bool {
        stats.delta >= config.alert_threshold && stats.span_minutes <= config.max_window_minutes
    }
}
