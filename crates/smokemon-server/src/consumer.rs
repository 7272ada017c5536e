use crate::queue::Consumer;
use crate::sink::OutputSink;
use smokemon_alert::engine::Engine;
use smokemon_alert::processor::IngestOutput;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ConsumeSummary {
    pub delivered: u64,
    pub redelivered: u64,
    pub alerts: u64,
    pub rejected: u64,
}

/// Drain the queue into the engine until every publisher is gone.
///
/// Each delivery is acknowledged only after `route` has returned and its
/// output has been handed to the sink.
pub async fn run(
    engine: &mut Engine,
    consumer: &mut Consumer,
    sink: &dyn OutputSink,
) -> ConsumeSummary {
    let mut summary = ConsumeSummary::default();

    while let Some(delivery) = consumer.next().await {
        summary.delivered += 1;
        if delivery.redelivered {
            summary.redelivered += 1;
            // Duplicates take an extra window slot; they are not deduplicated.
            tracing::debug!(
                tag = delivery.tag,
                channel_id = %delivery.channel_id,
                "Redelivered message"
            );
        }

        match engine.route(&delivery.channel_id, &delivery.payload) {
            Some(IngestOutput::Alert(alert)) => {
                summary.alerts += 1;
                sink.alert(&alert);
            }
            Some(IngestOutput::Rejected(rejected)) => {
                summary.rejected += 1;
                sink.rejected(&rejected);
            }
            None => {}
        }

        delivery.ack();
    }

    summary
}

/// Log per-channel totals, calling out channels that never alerted.
pub fn log_channel_summary(engine: &Engine) {
    for (channel_id, stats) in engine.stats() {
        tracing::info!(
            channel_id,
            accepted = stats.accepted,
            rejected = stats.rejected,
            alerts = stats.alerts,
            insufficient_data = stats.insufficient_data,
            "Channel summary"
        );
        if stats.alerts == 0 {
            tracing::info!(channel_id, "No alert triggered during the entire run");
        }
    }
}
