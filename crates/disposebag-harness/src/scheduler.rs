#![forbid(unsafe_code)]

//! Virtual-time scheduler.
//!
//! # Design
//!
//! Time only moves when the test calls [`TestScheduler::advance_time_by`] or
//! [`TestScheduler::advance_time_to`]. Due work runs in `(due, scheduling
//! order)` order, with the clock set to each job's due time while it runs.
//! Jobs run outside the scheduler lock, so a job may schedule more work or
//! dispose tasks.
//!
//! Periodic work follows the interval convention: the first tick fires one
//! full period after scheduling and tick indices start at 0.

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use disposebag_core::Disposable;

/// Handle for work scheduled on a [`TestScheduler`].
///
/// Disposing the handle stops any future runs; a run already in progress is
/// not interrupted.
#[derive(Debug, Default)]
pub struct ScheduledTask {
    disposed: AtomicBool,
    runs: AtomicU64,
}

impl ScheduledTask {
    /// How many times the work has run.
    #[must_use]
    pub fn runs(&self) -> u64 {
        self.runs.load(Ordering::Acquire)
    }
}

impl Disposable for ScheduledTask {
    fn dispose(&self) {
        self.disposed.store(true, Ordering::Release);
    }

    fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::Acquire)
    }
}

enum Job {
    Once(Box<dyn FnOnce() + Send>),
    Repeat {
        period: Duration,
        tick: u64,
        action: Box<dyn FnMut(u64) + Send>,
    },
}

struct Entry {
    due: Duration,
    seq: u64,
    task: Arc<ScheduledTask>,
    job: Job,
}

#[derive(Default)]
struct SchedulerInner {
    now: Duration,
    next_seq: u64,
    queue: Vec<Entry>,
}

impl SchedulerInner {
    fn push(&mut self, due: Duration, task: Arc<ScheduledTask>, job: Job) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(Entry {
            due,
            seq,
            task,
            job,
        });
    }

    fn pop_due(&mut self, limit: Duration) -> Option<Entry> {
        let index = self
            .queue
            .iter()
            .enumerate()
            .filter(|(_, e)| e.due <= limit)
            .min_by_key(|(_, e)| (e.due, e.seq))
            .map(|(i, _)| i)?;
        Some(self.queue.swap_remove(index))
    }
}

/// Deterministic scheduler driven by explicit clock advances.
///
/// Cloning shares the same clock and queue.
#[derive(Clone, Default)]
pub struct TestScheduler {
    inner: Arc<Mutex<SchedulerInner>>,
}

impl fmt::Debug for TestScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.lock();
        f.debug_struct("TestScheduler")
            .field("now", &inner.now)
            .field("pending", &inner.queue.len())
            .finish()
    }
}

impl TestScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.lock().now
    }

    /// Number of queued jobs, including ones whose task was disposed but
    /// which have not come due yet.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.lock().queue.len()
    }

    /// Run `action` once, `delay` from now.
    pub fn schedule_after(
        &self,
        delay: Duration,
        action: impl FnOnce() + Send + 'static,
    ) -> Arc<ScheduledTask> {
        let task = Arc::new(ScheduledTask::default());
        let mut inner = self.lock();
        let due = inner.now + delay;
        inner.push(due, Arc::clone(&task), Job::Once(Box::new(action)));
        task
    }

    /// Run `action(tick)` every `period`, starting one period from now.
    ///
    /// # Panics
    ///
    /// Panics if `period` is zero.
    pub fn schedule_periodic(
        &self,
        period: Duration,
        action: impl FnMut(u64) + Send + 'static,
    ) -> Arc<ScheduledTask> {
        assert!(!period.is_zero(), "periodic work needs a non-zero period");
        let task = Arc::new(ScheduledTask::default());
        let mut inner = self.lock();
        let due = inner.now + period;
        inner.push(
            due,
            Arc::clone(&task),
            Job::Repeat {
                period,
                tick: 0,
                action: Box::new(action),
            },
        );
        task
    }

    /// Advance the clock by `delta`, running everything that comes due.
    pub fn advance_time_by(&self, delta: Duration) {
        let target = self.now() + delta;
        self.advance_time_to(target);
    }

    /// Advance the clock to `target`, running everything that comes due.
    /// Moving backwards is a no-op.
    pub fn advance_time_to(&self, target: Duration) {
        loop {
            let entry = {
                let mut inner = self.lock();
                match inner.pop_due(target) {
                    Some(entry) => {
                        inner.now = inner.now.max(entry.due);
                        entry
                    }
                    None => {
                        inner.now = inner.now.max(target);
                        return;
                    }
                }
            };

            let Entry { due, task, job, .. } = entry;
            if task.is_disposed() {
                continue;
            }
            match job {
                Job::Once(action) => {
                    action();
                    task.runs.fetch_add(1, Ordering::AcqRel);
                }
                Job::Repeat {
                    period,
                    tick,
                    mut action,
                } => {
                    action(tick);
                    task.runs.fetch_add(1, Ordering::AcqRel);
                    if !task.is_disposed() {
                        let next = Job::Repeat {
                            period,
                            tick: tick + 1,
                            action,
                        };
                        self.lock().push(due + period, Arc::clone(&task), next);
                    }
                }
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, SchedulerInner> {
        self.inner.lock().expect("test scheduler lock poisoned")
    }
}
