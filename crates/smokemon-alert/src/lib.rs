//! Windowed alert engine for streamed temperature readings.
//!
//! Each registered channel owns a [`window::ChannelWindow`] of its most recent
//! readings and a [`processor::StreamProcessor`] that parses inbound payloads.
//! Once a window is full every reading is evaluated by the channel's
//! [`rules::AlertPolicy`]. The [`engine::Engine`] routes raw messages to the
//! processor registered for their channel.

pub mod engine;
pub mod error;
pub mod processor;
pub mod rules;
pub mod window;


use smokemon_common::types::{Alert, AlertKind, ChannelConfig};
use window::{ChannelWindow, WindowStats, WindowStatus};

/// Outcome of running a policy over a channel window.
#[derive(Debug, Clone, PartialEq)]
pub enum Evaluation {
    /// The window has not reached capacity yet.
    Collecting,
    /// The window is full but holds fewer than two valid values.
    InsufficientData { valid: usize },
    /// Enough data, condition not met.
    Quiet { delta: f64, elapsed_minutes: f64 },
    Fired(Alert),
}

impl Evaluation {
    pub fn into_alert(self) -> Option<Alert> {
        match self {
            Evaluation::Fired(alert) => Some(alert),
            _ => None,
        }
    }
}

/// A pure alert condition over window statistics.
///
/// Implementations hold no state; thresholds come from the channel's
/// [`ChannelConfig`].
pub trait AlertRule: Send + Sync {
    /// The alert kind this rule produces.
    fn kind(&self) -> AlertKind;

    /// Returns true when the window statistics satisfy the alert condition.
    fn triggers(&self, stats: &WindowStats, config: &ChannelConfig) -> bool;

    /// Evaluates a channel window and produces an alert when the rule fires.
    fn evaluate(&self, config: &ChannelConfig, window: &ChannelWindow) -> Evaluation {
        let stats = match window.status() {
            WindowStatus::Collecting { .. } => return Evaluation::Collecting,
            WindowStatus::InsufficientData { valid } => {
                return Evaluation::InsufficientData { valid }
            }
            WindowStatus::Ready(stats) => stats,
        };

        if !self.triggers(&stats, config) {
            return Evaluation::Quiet {
                delta: stats.delta,
                elapsed_minutes: stats.span_minutes,
            };
        }

        Evaluation::Fired(Alert {
            channel_id: config.channel_id.clone(),
            kind: self.kind(),
            magnitude: stats.delta,
            elapsed_minutes: stats.span_minutes,
            triggered_at: stats.newest.timestamp,
            threshold: config.alert_threshold,
        })
    }
}
