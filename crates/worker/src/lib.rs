//! Background execution of avatar pipeline jobs.
//!
//! [`TaskQueue`] (queue::TaskQueue) accepts submitted job ids, bounds
//! how many run concurrently, and exposes a probe for where any job
//! currently sits in its lifecycle.

pub mod queue;

pub use queue::{JobHandle, QueueError, QueueState, TaskQueue};
