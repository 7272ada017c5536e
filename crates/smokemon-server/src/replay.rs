//! Replays a temperature CSV export onto the delivery queue.

use crate::config::ReplayConfig;
use crate::queue::Publisher;
use anyhow::Context;
use smokemon_alert::processor::DROPOUT_TOKEN;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReplaySummary {
    pub rows: u64,
    pub published: u64,
    pub skipped_cells: u64,
    pub bad_rows: u64,
}

/// Reads a CSV with a header row: column 1 is the timestamp, each further
/// column is published to the channel configured for it.
#[derive(Debug, Clone)]
pub struct CsvReplay {
    path: PathBuf,
    columns: Vec<String>,
    interval: Duration,
    forward_dropouts: bool,
}

impl CsvReplay {
    pub fn from_config(config: &ReplayConfig) -> Self {
        Self {
            path: config.csv_path.clone(),
            columns: config.columns.clone(),
            interval: Duration::from_millis(config.interval_ms),
            forward_dropouts: config.forward_dropouts,
        }
    }

    pub async fn run(&self, publisher: &Publisher) -> anyhow::Result<ReplaySummary> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_path(&self.path)
            .with_context(|| format!("failed to open {}", self.path.display()))?;

        tracing::info!(path = %self.path.display(), channels = ?self.columns, "Replaying CSV");

        let mut summary = ReplaySummary::default();
        for (line, record) in reader.records().enumerate() {
            let record = match record {
                Ok(record) => record,
                Err(e) => {
                    summary.bad_rows += 1;
                    tracing::warn!(line = line + 2, error = %e, "Skipping unreadable CSV row");
                    continue;
                }
            };
            let Some(timestamp) = record.get(0).filter(|ts| !ts.is_empty()) else {
                summary.bad_rows += 1;
                tracing::warn!(line = line + 2, "Skipping CSV row without timestamp");
                continue;
            };

            if summary.rows > 0 && !self.interval.is_zero() {
                tokio::time::sleep(self.interval).await;
            }
            summary.rows += 1;

            for (idx, channel_id) in self.columns.iter().enumerate() {
                let cell = record.get(idx + 1).unwrap_or_default();
                let value = match (cell.is_empty(), self.forward_dropouts) {
                    (false, _) => cell,
                    (true, true) => DROPOUT_TOKEN,
                    (true, false) => {
                        summary.skipped_cells += 1;
                        continue;
                    }
                };

                let payload = format!("{timestamp},{value}").into_bytes();
                let outcome = publisher
                    .publish(channel_id, payload)
                    .await
                    .with_context(|| format!("failed to publish to {channel_id}"))?;
                summary.published += 1;
                tracing::info!(
                    channel_id = %channel_id,
                    timestamp,
                    temperature = value,
                    tag = outcome.tag,
                    "Sent reading"
                );
            }
        }

        Ok(summary)
    }
}
