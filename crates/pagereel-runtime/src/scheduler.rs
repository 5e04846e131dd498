#![forbid(unsafe_code)]

//! Repeating-task scheduling.
//!
//! A [`Scheduler`] turns "every `interval`, produce a message" into messages
//! the owner drains on its own thread. Component logic never runs inside a
//! task; the owner applies drained messages to its components, so there is
//! no shared mutable state between a task and the UI.
//!
//! Two implementations:
//!
//! - [`ThreadScheduler`]: one background thread per task, woken by a
//!   [`CancellationToken`] so cancellation is immediate.
//! - [`ManualScheduler`]: the host advances time explicitly. No threads,
//!   fully deterministic; suitable for `wasm32` hosts and tests.
//!
//! # Invariants
//!
//! 1. A cancelled task produces no further messages.
//! 2. Dropping a scheduler cancels every task it owns.
//! 3. A zero interval is rejected at scheduling time.
//! 4. Every elapsed interval is accounted for: the `ticks` passed to the
//!    message factories of one task sum to the number of elapsed intervals.

use std::collections::VecDeque;
use std::sync::mpsc;
use std::thread;

use pagereel_core::ReelError;
use web_time::Duration;

use crate::cancellation::{CancelGuard, CancellationSource, CancellationToken};

/// Identifier of a scheduled task, unique per scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

impl TaskId {
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Produces a task's message. The argument is the number of elapsed
/// intervals the message stands for; it is 1 unless overdue ticks were merged.
pub type MsgFactory<M> = Box<dyn Fn(u64) -> M + Send + Sync>;

/// A cancellable repeating-task primitive.
pub trait Scheduler<M> {
    /// Emit `make_msg(ticks)` every `interval` until cancelled. `ticks` is
    /// more than 1 only when a backlog of overdue intervals was merged.
    fn schedule_repeating(
        &mut self,
        interval: Duration,
        make_msg: MsgFactory<M>,
    ) -> Result<TaskId, ReelError>;

    /// Cancel a task. Returns `false` if it was not running.
    fn cancel(&mut self, task: TaskId) -> bool;

    /// Take every message produced so far, oldest first.
    fn drain_messages(&mut self) -> Vec<M>;

    /// Number of tasks still running.
    fn active_tasks(&self) -> usize;
}

fn check_interval(interval: Duration) -> Result<(), ReelError> {
    if interval.is_zero() {
        return Err(ReelError::NonPositiveInterval(interval));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// ThreadScheduler
// ---------------------------------------------------------------------------

struct RunningTask {
    id: TaskId,
    guard: CancelGuard,
    thread: Option<thread::JoinHandle<()>>,
}

impl RunningTask {
    /// Cancel the task and join its thread.
    fn stop(mut self) {
        let thread = self.thread.take();
        drop(self.guard);
        if let Some(handle) = thread {
            let _ = handle.join();
        }
    }
}

/// Runs each task on its own background thread.
pub struct ThreadScheduler<M: Send + 'static> {
    next_id: u64,
    active: Vec<RunningTask>,
    sender: mpsc::Sender<M>,
    receiver: mpsc::Receiver<M>,
}

impl<M: Send + 'static> ThreadScheduler<M> {
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            next_id: 0,
            active: Vec::new(),
            sender,
            receiver,
        }
    }

    /// Block until a message arrives or `timeout` elapses.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<M> {
        self.receiver.recv_timeout(timeout).ok()
    }

    /// Cancel and join every task.
    pub fn stop_all(&mut self) {
        for task in self.active.drain(..) {
            tracing::debug!(task = task.id.get(), "stopping repeating task");
            task.stop();
        }
    }

    fn run_task(interval: Duration, make_msg: MsgFactory<M>, sender: mpsc::Sender<M>, token: CancellationToken) {
        loop {
            if token.wait_timeout(interval) {
                break;
            }
            if sender.send(make_msg(1)).is_err() {
                break;
            }
        }
    }
}

impl<M: Send + 'static> Default for ThreadScheduler<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: Send + 'static> Scheduler<M> for ThreadScheduler<M> {
    fn schedule_repeating(
        &mut self,
        interval: Duration,
        make_msg: MsgFactory<M>,
    ) -> Result<TaskId, ReelError> {
        check_interval(interval)?;
        self.next_id += 1;
        let id = TaskId(self.next_id);

        let source = CancellationSource::new();
        let token = source.token();
        let sender = self.sender.clone();
        tracing::debug!(task = id.get(), interval_ms = interval.as_millis() as u64, "starting repeating task");
        let thread = thread::spawn(move || Self::run_task(interval, make_msg, sender, token));

        self.active.push(RunningTask {
            id,
            guard: source.drop_guard(),
            thread: Some(thread),
        });
        Ok(id)
    }

    fn cancel(&mut self, task: TaskId) -> bool {
        match self.active.iter().position(|t| t.id == task) {
            Some(idx) => {
                tracing::debug!(task = task.get(), "cancelling repeating task");
                self.active.remove(idx).stop();
                true
            }
            None => false,
        }
    }

    fn drain_messages(&mut self) -> Vec<M> {
        self.receiver.try_iter().collect()
    }

    fn active_tasks(&self) -> usize {
        self.active.len()
    }
}

impl<M: Send + 'static> Drop for ThreadScheduler<M> {
    fn drop(&mut self) {
        self.stop_all();
    }
}

// ---------------------------------------------------------------------------
// ManualScheduler
// ---------------------------------------------------------------------------

/// Upper bound on messages one task may emit in a single `advance`. Past it,
/// the remaining overdue ticks are merged into the last message.
const MAX_CATCH_UP_TICKS: u64 = 64;

struct ManualTask<M> {
    id: TaskId,
    interval: Duration,
    next_due: Duration,
    make_msg: MsgFactory<M>,
}

/// Deterministic scheduler driven by [`advance`](Self::advance).
pub struct ManualScheduler<M> {
    next_id: u64,
    now: Duration,
    tasks: Vec<ManualTask<M>>,
    queue: VecDeque<M>,
}

impl<M> ManualScheduler<M> {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            now: Duration::ZERO,
            tasks: Vec::new(),
            queue: VecDeque::new(),
        }
    }

    /// Current scheduler time.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Advance time by `dt`, queueing the message of every tick that falls
    /// due. Ticks from different tasks are queued in due-time order, ties
    /// broken by task id. Returns the number of messages queued.
    ///
    /// A task that falls more than [`MAX_CATCH_UP_TICKS`] intervals behind
    /// gets one merged message for the overflow, so the receiver can still
    /// account for every elapsed interval.
    pub fn advance(&mut self, dt: Duration) -> usize {
        let target = self.now.saturating_add(dt);
        let mut due: Vec<(Duration, TaskId, usize, u64)> = Vec::new();

        for (idx, task) in self.tasks.iter_mut().enumerate() {
            let mut fired = 0u64;
            while task.next_due <= target {
                let pending = (target - task.next_due).as_nanos() / task.interval.as_nanos() + 1;
                let pending = u64::try_from(pending).unwrap_or(u64::MAX);
                let ticks = if fired + 1 >= MAX_CATCH_UP_TICKS && pending > 1 {
                    tracing::warn!(task = task.id.get(), merged = pending, "merging overdue ticks");
                    // One step must stay representable as `interval * u32`.
                    pending.min(u64::from(u32::MAX))
                } else {
                    1
                };
                due.push((task.next_due, task.id, idx, ticks));
                let step = u32::try_from(ticks).unwrap_or(u32::MAX);
                task.next_due = task
                    .next_due
                    .saturating_add(task.interval.saturating_mul(step));
                fired += 1;
            }
        }

        due.sort_by_key(|(at, id, _, _)| (*at, *id));
        for (_, _, idx, ticks) in &due {
            self.queue.push_back((self.tasks[*idx].make_msg)(*ticks));
        }
        self.now = target;
        due.len()
    }
}

impl<M> Default for ManualScheduler<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> Scheduler<M> for ManualScheduler<M> {
    fn schedule_repeating(
        &mut self,
        interval: Duration,
        make_msg: MsgFactory<M>,
    ) -> Result<TaskId, ReelError> {
        check_interval(interval)?;
        self.next_id += 1;
        let id = TaskId(self.next_id);
        self.tasks.push(ManualTask {
            id,
            interval,
            next_due: self.now.saturating_add(interval),
            make_msg,
        });
        Ok(id)
    }

    fn cancel(&mut self, task: TaskId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != task);
        before != self.tasks.len()
    }

    fn drain_messages(&mut self) -> Vec<M> {
        self.queue.drain(..).collect()
    }

    fn active_tasks(&self) -> usize {
        self.tasks.len()
    }
}
