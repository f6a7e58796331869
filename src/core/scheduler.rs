//=========================================================================
// Task Scheduler
//=========================================================================
//
// Scene-owned list of delayed and periodic tasks driven by the scene clock.
//
// Architecture:
//   schedule_once/every() → Vec<ScheduledTask<T>> → poll(now) → Vec<T>
//                                   ↑
//                          CancelToken::cancel()
//
// Tasks carry plain payload values; the owning scene matches on the
// payloads returned by `poll()`. Nothing runs outside the scene's own
// tick, and `cancel_all()` on scene exit guarantees no task outlives it.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::trace;

//=== CancelToken =========================================================

/// Shared cancellation flag for one scheduled task.
///
/// Cloning shares the flag. Once cancelled the task never fires again.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

//=== ScheduledTask =======================================================

#[derive(Debug)]
struct ScheduledTask<T> {
    due_ms: u64,
    period_ms: Option<u64>,
    payload: T,
    token: CancelToken,
}

//=== TaskScheduler =======================================================

/// Ordered list of pending tasks for a single scene.
#[derive(Debug)]
pub struct TaskScheduler<T: Clone> {
    tasks: Vec<ScheduledTask<T>>,
}

impl<T: Clone> TaskScheduler<T> {
    pub fn new() -> Self {
        Self { tasks: Vec::new() }
    }

    //--- Scheduling -------------------------------------------------------

    /// Fires `payload` once, `delay_ms` after `now_ms`.
    pub fn schedule_once(&mut self, now_ms: u64, delay_ms: u64, payload: T) -> CancelToken {
        self.insert(now_ms + delay_ms, None, payload)
    }

    /// Fires `payload` every `period_ms`, first at `now_ms + period_ms`.
    ///
    /// # Panics
    ///
    /// Panics if `period_ms == 0`.
    pub fn schedule_every(&mut self, now_ms: u64, period_ms: u64, payload: T) -> CancelToken {
        assert!(period_ms > 0, "Task period must be positive");
        self.insert(now_ms + period_ms, Some(period_ms), payload)
    }

    fn insert(&mut self, due_ms: u64, period_ms: Option<u64>, payload: T) -> CancelToken {
        let token = CancelToken::new();
        self.tasks.push(ScheduledTask {
            due_ms,
            period_ms,
            payload,
            token: token.clone(),
        });
        token
    }

    //--- poll() -----------------------------------------------------------
    //
    // Returns the payloads of every task due at or before `now_ms`, in due
    // order. A periodic task that fell behind fires once per missed period.
    // One-shot and cancelled tasks are dropped from the list.
    //
    pub fn poll(&mut self, now_ms: u64) -> Vec<T> {
        let mut fired: Vec<(u64, usize, T)> = Vec::new();

        for (index, task) in self.tasks.iter_mut().enumerate() {
            while !task.token.is_cancelled() && task.due_ms <= now_ms {
                fired.push((task.due_ms, index, task.payload.clone()));
                match task.period_ms {
                    Some(period) => task.due_ms += period,
                    None => {
                        task.token.cancel();
                    }
                }
            }
        }

        self.tasks.retain(|task| !task.token.is_cancelled());

        fired.sort_by_key(|(due, index, _)| (*due, *index));
        if !fired.is_empty() {
            trace!("Scheduler fired {} tasks at {}ms", fired.len(), now_ms);
        }
        fired.into_iter().map(|(_, _, payload)| payload).collect()
    }

    //--- Cancellation -----------------------------------------------------

    /// Cancels every pending task. Outstanding tokens observe the cancel.
    pub fn cancel_all(&mut self) {
        for task in self.tasks.drain(..) {
            task.token.cancel();
        }
    }

    /// Number of live tasks.
    pub fn len(&self) -> usize {
        self.tasks.iter().filter(|t| !t.token.is_cancelled()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Clone> Default for TaskScheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
