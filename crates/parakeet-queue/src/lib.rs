//! Rate-gated serial work lanes.
//!
//! Every capability runs on one lane: a fixed-ceiling [`RateGate`] in front
//! of a strictly-serial [`SerialQueue`], replenished by a recurring
//! [`ResetScheduler`]. The [`Lane`] ties the three together and drives the
//! bound [`Worker`] one item at a time.

pub mod gate;
pub mod lane;
pub mod scheduler;
pub mod serial_queue;

pub use gate::RateGate;
pub use lane::{Lane, LaneContext, Worker};
pub use scheduler::ResetScheduler;
pub use serial_queue::SerialQueue;
