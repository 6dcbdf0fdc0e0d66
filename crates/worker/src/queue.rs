//! Bounded in-process task queue over the pipeline runner.
//!
//! Submissions beyond the concurrency limit wait for a permit rather
//! than being rejected, so callers can enqueue freely and poll status.
//! Each job id may be in flight at most once at a time.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use persona_pipeline::PipelineRunner;
use tokio::sync::{watch, Mutex, Semaphore};
use uuid::Uuid;

/// Where a job sits in the queue's lifecycle.
///
/// `Idle` means the queue holds no record of the id: never submitted,
/// or already finished and drained from the registry. The persisted
/// job row remains the durable source of truth for finished jobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueState {
    Idle,
    Pending,
    Running,
    Success,
    Failure,
}

impl QueueState {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueueState::Idle => "IDLE",
            QueueState::Pending => "PENDING",
            QueueState::Running => "RUNNING",
            QueueState::Success => "SUCCESS",
            QueueState::Failure => "FAILURE",
        }
    }
}

/// Execution state broadcast to handles watching a submitted job.
#[derive(Debug, Clone)]
enum ExecState {
    Pending,
    Running,
    Success,
    Failure(String),
}

impl ExecState {
    fn queue_state(&self) -> QueueState {
        match self {
            ExecState::Pending => QueueState::Pending,
            ExecState::Running => QueueState::Running,
            ExecState::Success => QueueState::Success,
            ExecState::Failure(_) => QueueState::Failure,
        }
    }

    fn is_terminal(&self) -> bool {
        matches!(self, ExecState::Success | ExecState::Failure(_))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    #[error("Job {0} is already in flight")]
    AlreadyInFlight(Uuid),

    #[error("Queue is shutting down and no longer accepts jobs")]
    ShuttingDown,
}

struct QueueInner {
    runner: Arc<PipelineRunner>,
    permits: Arc<Semaphore>,
    inflight: Mutex<HashMap<Uuid, watch::Receiver<ExecState>>>,
    closed: AtomicBool,
}

/// Executes submitted jobs on the tokio runtime, at most
/// `worker_count` concurrently.
#[derive(Clone)]
pub struct TaskQueue {
    inner: Arc<QueueInner>,
}

impl TaskQueue {
    pub fn new(runner: Arc<PipelineRunner>, worker_count: usize) -> Self {
        Self {
            inner: Arc::new(QueueInner {
                runner,
                permits: Arc::new(Semaphore::new(worker_count.max(1))),
                inflight: Mutex::new(HashMap::new()),
                closed: AtomicBool::new(false),
            }),
        }
    }

    /// Submit a job for execution. The job starts PENDING and moves to
    /// RUNNING once a worker permit is free.
    ///
    /// Rejects ids that are already in flight and submissions after
    /// [`shutdown`](Self::shutdown) has begun.
    pub async fn submit(&self, job_id: Uuid) -> Result<JobHandle, QueueError> {
        if self.inner.closed.load(Ordering::SeqCst) {
            return Err(QueueError::ShuttingDown);
        }

        let (tx, rx) = watch::channel(ExecState::Pending);
        {
            let mut inflight = self.inner.inflight.lock().await;
            if inflight.contains_key(&job_id) {
                return Err(QueueError::AlreadyInFlight(job_id));
            }
            inflight.insert(job_id, rx.clone());
        }

        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            // Permit closure only happens on runtime teardown.
            let permit = match Arc::clone(&inner.permits).acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => {
                    inner.inflight.lock().await.remove(&job_id);
                    return;
                }
            };
            let _ = tx.send(ExecState::Running);

            tracing::debug!(%job_id, "worker picked up job");
            let outcome = inner.runner.run(job_id).await;
            drop(permit);

            // Drain the registry before broadcasting the terminal
            // state, so a status probe after wait() reports IDLE.
            inner.inflight.lock().await.remove(&job_id);
            match outcome {
                Ok(_) => {
                    let _ = tx.send(ExecState::Success);
                }
                Err(err) => {
                    tracing::warn!(%job_id, error = %err, "job execution failed");
                    let _ = tx.send(ExecState::Failure(err.to_string()));
                }
            }
        });

        Ok(JobHandle { job_id, rx })
    }

    /// Probe where a job currently sits. `Idle` for ids the queue does
    /// not know about.
    pub async fn status(&self, job_id: Uuid) -> QueueState {
        let inflight = self.inner.inflight.lock().await;
        match inflight.get(&job_id) {
            Some(rx) => rx.borrow().queue_state(),
            None => QueueState::Idle,
        }
    }

    /// Number of jobs currently tracked by the queue.
    pub async fn in_flight(&self) -> usize {
        self.inner.inflight.lock().await.len()
    }

    /// Stop accepting submissions and wait for every in-flight job to
    /// reach a terminal state.
    pub async fn shutdown(&self) {
        self.inner.closed.store(true, Ordering::SeqCst);
        let receivers: Vec<watch::Receiver<ExecState>> = {
            let inflight = self.inner.inflight.lock().await;
            inflight.values().cloned().collect()
        };
        for mut rx in receivers {
            while !rx.borrow().is_terminal() {
                if rx.changed().await.is_err() {
                    break;
                }
            }
        }
    }
}

/// A watch on one submitted job.
#[derive(Debug)]
pub struct JobHandle {
    job_id: Uuid,
    rx: watch::Receiver<ExecState>,
}

impl JobHandle {
    pub fn job_id(&self) -> Uuid {
        self.job_id
    }

    /// The job's current state as seen by this handle.
    pub fn state(&self) -> QueueState {
        self.rx.borrow().queue_state()
    }

    /// Whether the job has reached SUCCESS or FAILURE.
    pub fn is_finished(&self) -> bool {
        self.rx.borrow().is_terminal()
    }

    /// Whether the job finished successfully.
    pub fn is_success(&self) -> bool {
        matches!(*self.rx.borrow(), ExecState::Success)
    }

    /// Wait until the job reaches SUCCESS or FAILURE and return that
    /// state along with the failure message, if any.
    pub async fn wait(&mut self) -> (QueueState, Option<String>) {
        loop {
            let snapshot = self.rx.borrow_and_update().clone();
            match snapshot {
                ExecState::Failure(message) => return (QueueState::Failure, Some(message)),
                ExecState::Success => return (QueueState::Success, None),
                _ => {
                    if self.rx.changed().await.is_err() {
                        // Sender gone without a terminal broadcast.
                        let state = self.rx.borrow().queue_state();
                        return (state, None);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queue_state_labels() {
        assert_eq!(QueueState::Idle.as_str(), "IDLE");
        assert_eq!(QueueState::Pending.as_str(), "PENDING");
        assert_eq!(QueueState::Running.as_str(), "RUNNING");
        assert_eq!(QueueState::Success.as_str(), "SUCCESS");
        assert_eq!(QueueState::Failure.as_str(), "FAILURE");
    }
}
