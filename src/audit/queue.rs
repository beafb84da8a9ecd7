//! Rate-limited audit queue with a single background worker.

use crate::audit::checker::NumberChecker;
use crate::audit::record::{AuditResult, AuditStatus};
use crate::error::{RekapError, Result};
use std::collections::VecDeque;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// How long [`AuditQueue::enqueue`] waits for space before giving up.
pub const ENQUEUE_TIMEOUT: Duration = Duration::from_secs(1);

/// How often an idle or paused worker rechecks its state.
const IDLE_POLL: Duration = Duration::from_millis(200);

/// Counter snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueueStats {
    pub queued: usize,
    pub processed: usize,
    pub skipped: usize,
    pub errors: usize,
}

impl QueueStats {
    pub fn completed(&self) -> usize {
        self.processed + self.skipped + self.errors
    }
}

#[derive(Default)]
struct State {
    pending: VecDeque<String>,
    running: bool,
    paused: bool,
    /// A number is being checked or the post-check delay is running
    busy: bool,
    in_delay: bool,
    stats: QueueStats,
    results: Vec<AuditResult>,
}

struct Shared {
    state: Mutex<State>,
    /// Signalled when items are added, state flags change or stop is requested
    wake: Condvar,
    /// Signalled when space frees up or the worker goes idle
    drained: Condvar,
    capacity: usize,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Bounded queue of phone numbers processed one at a time with a fixed delay.
pub struct AuditQueue {
    shared: Arc<Shared>,
    delay: Duration,
    worker: Option<JoinHandle<()>>,
}

impl AuditQueue {
    /// Create a queue holding at most `max_queue` pending numbers.
    pub fn new(max_queue: usize, delay: Duration) -> Result<Self> {
        if max_queue == 0 {
            return Err(RekapError::ConfigError(
                "max_queue must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            shared: Arc::new(Shared {
                state: Mutex::new(State::default()),
                wake: Condvar::new(),
                drained: Condvar::new(),
                capacity: max_queue,
            }),
            delay,
            worker: None,
        })
    }

    /// Add a number, waiting up to [`ENQUEUE_TIMEOUT`] for space.
    pub fn enqueue(&self, nomor: impl Into<String>) -> bool {
        self.enqueue_timeout(nomor, ENQUEUE_TIMEOUT)
    }

    /// Add a number, waiting up to `timeout` for space. Returns `false` if full.
    pub fn enqueue_timeout(&self, nomor: impl Into<String>, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut state = self.shared.lock();

        while state.pending.len() >= self.shared.capacity {
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            state = self
                .shared
                .drained
                .wait_timeout(state, deadline - now)
                .unwrap_or_else(PoisonError::into_inner)
                .0;
        }

        state.pending.push_back(nomor.into());
        state.stats.queued = state.pending.len();
        self.shared.wake.notify_all();
        true
    }

    /// Start the worker. Does nothing if it is already running.
    pub fn start<C: NumberChecker>(&mut self, checker: C) -> Result<()> {
        {
            let mut state = self.shared.lock();
            if state.running {
                return Ok(());
            }
            state.running = true;
            state.paused = false;
        }

        // A previous worker has already observed running == false.
        if let Some(handle) = self.worker.take() {
            let _ = handle.join();
        }

        let shared = Arc::clone(&self.shared);
        let delay = self.delay;
        let handle = thread::Builder::new()
            .name("rekap-audit".to_string())
            .spawn(move || worker_loop(shared, checker, delay))?;
        self.worker = Some(handle);

        tracing::debug!("audit worker started");
        Ok(())
    }

    pub fn pause(&self) {
        self.shared.lock().paused = true;
        self.shared.wake.notify_all();
    }

    pub fn resume(&self) {
        self.shared.lock().paused = false;
        self.shared.wake.notify_all();
    }

    /// Stop the worker after its current number and wait for it to exit.
    ///
    /// Pending numbers stay queued and are picked up by the next `start`.
    pub fn stop(&mut self) {
        self.shared.lock().running = false;
        self.shared.wake.notify_all();
        self.shared.drained.notify_all();

        if let Some(handle) = self.worker.take() {
            let _ = handle.join();
        }
        tracing::debug!("audit worker stopped");
    }

    pub fn is_running(&self) -> bool {
        self.shared.lock().running
    }

    pub fn is_paused(&self) -> bool {
        self.shared.lock().paused
    }

    pub fn len(&self) -> usize {
        self.shared.lock().pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> QueueStats {
        self.shared.lock().stats
    }

    /// Results so far, in completion order.
    pub fn results(&self) -> Vec<AuditResult> {
        self.shared.lock().results.clone()
    }

    /// Block until every queued number has been checked.
    ///
    /// The trailing delay after the last number is not waited for. Returns
    /// early if the worker is stopped or paused with work left.
    pub fn wait_idle(&self) {
        let mut state = self.shared.lock();
        loop {
            let idle = state.pending.is_empty() && (!state.busy || state.in_delay);
            if idle || !state.running || state.paused {
                return;
            }
            state = self
                .shared
                .drained
                .wait_timeout(state, IDLE_POLL)
                .unwrap_or_else(PoisonError::into_inner)
                .0;
        }
    }
}

impl Drop for AuditQueue {
    fn drop(&mut self) {
        self.stop();
    }
}

fn worker_loop<C: NumberChecker>(shared: Arc<Shared>, checker: C, delay: Duration) {
    loop {
        let nomor = {
            let mut state = shared.lock();
            loop {
                if !state.running {
                    return;
                }
                if !state.paused {
                    if let Some(nomor) = state.pending.pop_front() {
                        state.stats.queued = state.pending.len();
                        state.busy = true;
                        state.in_delay = false;
                        break nomor;
                    }
                }
                state = shared
                    .wake
                    .wait_timeout(state, IDLE_POLL)
                    .unwrap_or_else(PoisonError::into_inner)
                    .0;
            }
        };
        shared.drained.notify_all();

        let result = panic::catch_unwind(AssertUnwindSafe(|| checker.check(&nomor)))
            .unwrap_or_else(|_| {
                AuditResult::failed(
                    &nomor,
                    AuditStatus::QueueError,
                    "checker panicked",
                    "Unexpected error",
                )
            });

        {
            let mut state = shared.lock();
            match result.status {
                AuditStatus::Success => state.stats.processed += 1,
                AuditStatus::Skipped => state.stats.skipped += 1,
                AuditStatus::ApiError | AuditStatus::QueueError => state.stats.errors += 1,
            }
            tracing::info!(
                nomor = %result.nomor,
                status = %result.status,
                "audit result"
            );
            state.results.push(result);
            state.in_delay = true;
        }
        shared.drained.notify_all();

        // Rate limit; stop cuts the delay short.
        let deadline = Instant::now() + delay;
        let mut state = shared.lock();
        while state.running {
            let now = Instant::now();
            if now >= deadline {
                break;
            }
            state = shared
                .wake
                .wait_timeout(state, deadline - now)
                .unwrap_or_else(PoisonError::into_inner)
                .0;
        }
        state.busy = false;
        state.in_delay = false;
        drop(state);
        shared.drained.notify_all();
    }
}
