//! Recurring rate-limit reset job.
//!
//! Every interval the scheduler resets its gate to the ceiling and resumes
//! the paired queue (a no-op when the queue was never paused). Replenishment
//! runs on a wall-clock cadence, independent of traffic. The handle stops
//! the recursion for shutdown and tests.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use parakeet_core::models::CapabilityId;

use crate::gate::RateGate;
use crate::serial_queue::SerialQueue;

pub struct ResetScheduler {
    shutdown_tx: mpsc::Sender<()>,
}

impl ResetScheduler {
    /// Arm the recurring reset for one lane.
    pub fn start<T: Send + 'static>(
        id: CapabilityId,
        gate: Arc<RateGate>,
        queue: SerialQueue<T>,
        interval: Duration,
    ) -> Self {
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel(1);

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = shutdown_rx.recv() => {
                        tracing::debug!(lane = %id, "reset scheduler stopped");
                        break;
                    }
                    _ = tokio::time::sleep(interval) => {
                        tracing::info!(lane = %id, ceiling = gate.ceiling(), "resetting rate limit");
                        gate.reset();
                        queue.resume(); // in case the lane paused itself
                    }
                }
            }
        });

        Self { shutdown_tx }
    }

    /// Stop the recurring job. The current tick, if mid-fire, completes.
    pub async fn shutdown(&self) {
        let _ = self.shutdown_tx.send(()).await;
    }
}
