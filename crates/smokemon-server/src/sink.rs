use smokemon_common::types::{Alert, RejectedInput};
use std::sync::{Mutex, PoisonError};

/// Receives the two outbound streams of the engine.
pub trait OutputSink: Send + Sync {
    fn alert(&self, alert: &Alert);
    fn rejected(&self, rejected: &RejectedInput);
}

/// Reports alerts and rejected input as structured log records.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl OutputSink for LogSink {
    fn alert(&self, alert: &Alert) {
        tracing::warn!(
            channel_id = %alert.channel_id,
            kind = %alert.kind,
            magnitude = alert.magnitude,
            elapsed_minutes = alert.elapsed_minutes,
            threshold = alert.threshold,
            triggered_at = %alert.triggered_at,
            "{alert}"
        );
    }

    fn rejected(&self, rejected: &RejectedInput) {
        tracing::warn!(
            channel_id = %rejected.channel_id,
            reason = %rejected.reason,
            payload = %rejected.raw_payload,
            detail = %rejected.detail,
            "Rejected input"
        );
    }
}

/// Keeps every record in memory.
#[derive(Debug, Default)]
pub struct CollectingSink {
    alerts: Mutex<Vec<Alert>>,
    rejected: Mutex<Vec<RejectedInput>>,
}

impl CollectingSink {
    pub fn alerts(&self) -> Vec<Alert> {
        self.alerts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn rejected_inputs(&self) -> Vec<RejectedInput> {
        self.rejected
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl OutputSink for CollectingSink {
    fn alert(&self, alert: &Alert) {
        self.alerts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(alert.clone());
    }

    fn rejected(&self, rejected: &RejectedInput) {
        self.rejected
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(rejected.clone());
    }
}
