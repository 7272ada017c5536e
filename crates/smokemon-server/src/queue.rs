//! In-process delivery queue with explicit acknowledgments.
//!
//! A publisher keeps at most one unacknowledged delivery in flight. A delivery
//! dropped without [`Delivery::ack`] is published again, flagged as
//! redelivered, so readings are delivered at least once.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};

#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    #[error("queue consumer has shut down")]
    Closed,

    #[error("delivery to '{channel_id}' not acknowledged after {attempts} attempts")]
    Unacknowledged { channel_id: String, attempts: u32 },
}

#[derive(Debug)]
pub struct Delivery {
    pub tag: u64,
    pub channel_id: String,
    pub payload: Vec<u8>,
    pub redelivered: bool,
    ack: oneshot::Sender<()>,
}

impl Delivery {
    /// Acknowledge the delivery. Call only after it has been fully processed.
    pub fn ack(self) {
        let _ = self.ack.send(());
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublishOutcome {
    pub tag: u64,
    pub attempts: u32,
}

#[derive(Debug, Clone)]
pub struct Publisher {
    tx: mpsc::Sender<Delivery>,
    next_tag: Arc<AtomicU64>,
    max_redeliveries: u32,
}

impl Publisher {
    /// Publish a payload and wait until the consumer acknowledges it.
    pub async fn publish(
        &self,
        channel_id: &str,
        payload: Vec<u8>,
    ) -> Result<PublishOutcome, QueueError> {
        let attempts = self.max_redeliveries + 1;
        for attempt in 1..=attempts {
            let (ack_tx, ack_rx) = oneshot::channel();
            let tag = self.next_tag.fetch_add(1, Ordering::Relaxed) + 1;
            let delivery = Delivery {
                tag,
                channel_id: channel_id.to_string(),
                payload: payload.clone(),
                redelivered: attempt > 1,
                ack: ack_tx,
            };

            self.tx.send(delivery).await.map_err(|_| QueueError::Closed)?;

            if ack_rx.await.is_ok() {
                return Ok(PublishOutcome {
                    tag,
                    attempts: attempt,
                });
            }
            tracing::warn!(
                channel_id,
                tag,
                attempt,
                "Delivery dropped without ack, redelivering"
            );
        }

        Err(QueueError::Unacknowledged {
            channel_id: channel_id.to_string(),
            attempts,
        })
    }
}

#[derive(Debug)]
pub struct Consumer {
    rx: mpsc::Receiver<Delivery>,
}

impl Consumer {
    /// Next delivery, or `None` once every publisher is gone.
    pub async fn next(&mut self) -> Option<Delivery> {
        self.rx.recv().await
    }
}

pub fn queue(max_redeliveries: u32) -> (Publisher, Consumer) {
    let (tx, rx) = mpsc::channel(1);
    let publisher = Publisher {
        tx,
        next_tag: Arc::new(AtomicU64::new(0)),
        max_redeliveries,
    };
    (publisher, Consumer { rx })
}
