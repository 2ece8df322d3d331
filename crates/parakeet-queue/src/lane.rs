//! Capability lane: gate + queue + scheduler + bound worker.
//!
//! The drain loop owns the full post-processing contract so individual
//! workers do not repeat it: after every cycle the gate is decremented,
//! the lane pauses itself once the gate is exhausted, and polling workers
//! get their item re-enqueued at the tail as the next heartbeat. Worker
//! failures are logged and never cross the lane boundary.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;

use parakeet_core::models::CapabilityId;

use crate::gate::RateGate;
use crate::scheduler::ResetScheduler;
use crate::serial_queue::SerialQueue;

/// One unit of capability work.
#[async_trait]
pub trait Worker<T>: Send + Sync + 'static {
    /// Process one dequeued item. Errors are logged by the lane and treated
    /// as a no-op for the cycle; the heartbeat continues.
    async fn poll(&self, item: T, ctx: &LaneContext<T>) -> Result<()>;

    /// Whether the lane re-enqueues the item after each cycle. Polling
    /// capabilities return `true`; lanes fed with real one-shot work
    /// (replies) return `false`.
    fn recycle(&self) -> bool {
        true
    }
}

/// Handed to the worker on every cycle; gives access to the lane's own
/// queue (for the pause-and-repush retry convention) and gate.
pub struct LaneContext<T> {
    id: CapabilityId,
    gate: Arc<RateGate>,
    queue: SerialQueue<T>,
}

impl<T> LaneContext<T> {
    pub fn id(&self) -> CapabilityId {
        self.id
    }

    pub fn gate(&self) -> &RateGate {
        &self.gate
    }

    pub fn queue(&self) -> &SerialQueue<T> {
        &self.queue
    }
}

/// A running capability lane.
pub struct Lane<T> {
    id: CapabilityId,
    gate: Arc<RateGate>,
    queue: SerialQueue<T>,
    scheduler: ResetScheduler,
}

impl<T: Clone + Send + 'static> Lane<T> {
    /// Register a capability: construct its gate, bind the worker to the
    /// queue, and arm the reset scheduler.
    pub fn start(
        id: CapabilityId,
        ceiling: u32,
        reset_interval: Duration,
        queue: SerialQueue<T>,
        worker: Arc<dyn Worker<T>>,
    ) -> Self {
        let gate = Arc::new(RateGate::new(ceiling));
        let scheduler =
            ResetScheduler::start(id, gate.clone(), queue.clone(), reset_interval);

        let ctx = LaneContext {
            id,
            gate: gate.clone(),
            queue: queue.clone(),
        };
        let drain_queue = queue.clone();
        tokio::spawn(async move {
            while let Some(item) = drain_queue.next().await {
                let heartbeat = worker.recycle().then(|| item.clone());

                if let Err(err) = worker.poll(item, &ctx).await {
                    tracing::error!(lane = %ctx.id, error = %err, "capability cycle failed");
                }

                let remaining = ctx.gate.decrement();
                tracing::debug!(lane = %ctx.id, remaining, "cycle complete");
                if remaining == 0 {
                    tracing::info!(lane = %ctx.id, "rate limit reached, pausing lane");
                    ctx.queue.pause();
                }
                if let Some(item) = heartbeat {
                    ctx.queue.push(item);
                }
            }
            tracing::debug!(lane = %ctx.id, "lane drained and closed");
        });

        Self {
            id,
            gate,
            queue,
            scheduler,
        }
    }

    pub fn id(&self) -> CapabilityId {
        self.id
    }

    pub fn gate(&self) -> &RateGate {
        &self.gate
    }

    pub fn queue(&self) -> &SerialQueue<T> {
        &self.queue
    }

    /// Seed the lane with an item.
    pub fn seed(&self, item: T) {
        self.queue.push(item);
    }

    /// Stop the reset scheduler and close the queue. The in-flight cycle,
    /// if any, completes before the drain loop exits.
    pub async fn shutdown(&self) {
        self.scheduler.shutdown().await;
        self.queue.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use tokio::sync::mpsc;
    use tokio::time::Instant;

    /// Worker that sleeps, records overlap and start times, and reports
    /// every completed cycle on a channel.
    struct Probe {
        delay: Duration,
        fail: bool,
        recycle: bool,
        in_flight: AtomicUsize,
        max_overlap: AtomicUsize,
        starts: Mutex<Vec<Instant>>,
        done_tx: mpsc::UnboundedSender<u32>,
    }

    impl Probe {
        fn new(done_tx: mpsc::UnboundedSender<u32>) -> Self {
            Self {
                delay: Duration::from_millis(10),
                fail: false,
                recycle: true,
                in_flight: AtomicUsize::new(0),
                max_overlap: AtomicUsize::new(0),
                starts: Mutex::new(Vec::new()),
                done_tx,
            }
        }
    }

    #[async_trait]
    impl Worker<u32> for Probe {
        async fn poll(&self, item: u32, _ctx: &LaneContext<u32>) -> Result<()> {
            let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_overlap.fetch_max(current, Ordering::SeqCst);
            self.starts.lock().unwrap().push(Instant::now());

            tokio::time::sleep(self.delay).await;

            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            let _ = self.done_tx.send(item);
            if self.fail {
                anyhow::bail!("probe failure for item {item}");
            }
            Ok(())
        }

        fn recycle(&self) -> bool {
            self.recycle
        }
    }

    async fn expect_no_cycle(done_rx: &mut mpsc::UnboundedReceiver<u32>) {
        let extra = tokio::time::timeout(Duration::from_secs(5), done_rx.recv()).await;
        assert!(extra.is_err(), "unexpected extra cycle: {:?}", extra);
    }

    #[tokio::test(start_paused = true)]
    async fn test_serial_exclusivity() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut probe = Probe::new(tx);
        probe.recycle = false;
        let probe = Arc::new(probe);

        let lane = Lane::start(
            CapabilityId::Reply,
            100,
            Duration::from_secs(3600),
            SerialQueue::new(),
            probe.clone(),
        );
        for i in 0..5 {
            lane.seed(i);
        }
        for _ in 0..5 {
            rx.recv().await.unwrap();
        }

        assert_eq!(probe.max_overlap.load(Ordering::SeqCst), 1);
        lane.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_correctness() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut probe = Probe::new(tx);
        probe.recycle = false;
        let probe = Arc::new(probe);

        let queue = SerialQueue::new();
        queue.pause();
        let lane = Lane::start(
            CapabilityId::Mentions,
            100,
            Duration::from_secs(3600),
            queue,
            probe.clone(),
        );
        for i in 10..13 {
            lane.seed(i);
        }

        // Nothing starts while paused.
        expect_no_cycle(&mut rx).await;

        lane.queue().resume();
        for expected in 10..13 {
            assert_eq!(rx.recv().await, Some(expected));
        }
        expect_no_cycle(&mut rx).await;
        lane.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_heartbeat_continuity() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let probe = Arc::new(Probe::new(tx));

        let lane = Lane::start(
            CapabilityId::Tweet,
            3,
            Duration::from_secs(3600),
            SerialQueue::new(),
            probe.clone(),
        );
        lane.seed(7);

        // Exactly ceiling cycles, then the lane pauses itself.
        for _ in 0..3 {
            assert_eq!(rx.recv().await, Some(7));
        }
        expect_no_cycle(&mut rx).await;
        assert_eq!(lane.gate().remaining(), 0);
        assert!(lane.queue().is_paused());

        // A replenishment cycle buys exactly ceiling more.
        lane.gate().reset();
        lane.queue().resume();
        for _ in 0..3 {
            assert_eq!(rx.recv().await, Some(7));
        }
        expect_no_cycle(&mut rx).await;
        assert!(lane.queue().is_paused());
        lane.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_failures_do_not_stop_the_lane() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut probe = Probe::new(tx);
        probe.fail = true;
        probe.recycle = false;
        let probe = Arc::new(probe);

        let lane = Lane::start(
            CapabilityId::Reply,
            100,
            Duration::from_secs(3600),
            SerialQueue::new(),
            probe.clone(),
        );
        lane.seed(1);
        lane.seed(2);

        // Both items settle despite every poll failing.
        assert_eq!(rx.recv().await, Some(1));
        assert_eq!(rx.recv().await, Some(2));
        assert_eq!(lane.gate().remaining(), 98);
        lane.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_failing_lane_does_not_affect_others() {
        let (tx_a, mut rx_a) = mpsc::unbounded_channel();
        let mut failing = Probe::new(tx_a);
        failing.fail = true;
        let failing = Arc::new(failing);

        let (tx_b, mut rx_b) = mpsc::unbounded_channel();
        let mut healthy = Probe::new(tx_b);
        healthy.recycle = false;
        let healthy = Arc::new(healthy);

        let lane_a = Lane::start(
            CapabilityId::TokenSwap,
            2,
            Duration::from_secs(3600),
            SerialQueue::new(),
            failing.clone(),
        );
        let lane_b = Lane::start(
            CapabilityId::SolStake,
            5,
            Duration::from_secs(3600),
            SerialQueue::new(),
            healthy.clone(),
        );

        lane_a.seed(0);
        for i in 0..3 {
            lane_b.seed(i);
        }

        // Lane A burns its gate on failures and pauses.
        for _ in 0..2 {
            rx_a.recv().await.unwrap();
        }
        expect_no_cycle(&mut rx_a).await;
        assert!(lane_a.queue().is_paused());

        // Lane B is untouched: its three items drain and its gate reflects
        // exactly three cycles.
        for expected in 0..3 {
            assert_eq!(rx_b.recv().await, Some(expected));
        }
        assert_eq!(lane_b.gate().remaining(), 2);
        assert!(!lane_b.queue().is_paused());

        lane_a.shutdown().await;
        lane_b.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausted_lane_waits_for_scheduler() {
        // ceiling=1, interval=100ms, processing takes 10ms: the heartbeat
        // re-pushed at t=10ms must not start again until the reset at t=100ms.
        let (tx, mut rx) = mpsc::unbounded_channel();
        let probe = Arc::new(Probe::new(tx));

        let lane = Lane::start(
            CapabilityId::Mentions,
            1,
            Duration::from_millis(100),
            SerialQueue::new(),
            probe.clone(),
        );

        let origin = Instant::now();
        lane.seed(9);

        rx.recv().await.unwrap();
        rx.recv().await.unwrap();

        let starts = probe.starts.lock().unwrap().clone();
        let first = starts[0].duration_since(origin);
        let second = starts[1].duration_since(origin);
        assert!(first < Duration::from_millis(10), "first cycle starts immediately");
        assert!(
            second >= Duration::from_millis(100),
            "second cycle must wait for the scheduled reset, started at {second:?}"
        );
        assert!(second < Duration::from_millis(150));
        lane.shutdown().await;
    }
}
