//! Periodic task schedule
//!
//! Replaces free-running timers with explicit deadlines on the engine clock.
//! The host (or a test) calls into the engine with the current time and the
//! schedule hands back every task that has come due, earliest first.

/// Maximum missed runs replayed for one task before skipping ahead
pub const MAX_CATCH_UP_RUNS: u32 = 8;

/// Work the engine performs periodically
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    PassiveTick,
    Autosave,
}

#[derive(Debug, Clone)]
struct PeriodicTask {
    kind: TaskKind,
    period_ms: f64,
    next_due_ms: f64,
}

/// Set of periodic tasks with a shared stop switch
#[derive(Debug, Clone, Default)]
pub struct Schedule {
    tasks: Vec<PeriodicTask>,
    stopped: bool,
}

impl Schedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `kind` every `period_ms`, first due one period after `now_ms`
    pub fn every(&mut self, kind: TaskKind, period_ms: f64, now_ms: f64) {
        self.tasks.retain(|t| t.kind != kind);
        self.tasks.push(PeriodicTask {
            kind,
            period_ms,
            next_due_ms: now_ms + period_ms,
        });
    }

    /// Pop the earliest task due at or before `now_ms`
    ///
    /// Returns the task and its scheduled time, and moves its deadline one
    /// period forward. A task that fell more than `MAX_CATCH_UP_RUNS` periods
    /// behind is realigned to `now_ms` and runs once.
    pub fn pop_due(&mut self, now_ms: f64) -> Option<(TaskKind, f64)> {
        if self.stopped {
            return None;
        }

        let task = self
            .tasks
            .iter_mut()
            .filter(|t| t.next_due_ms <= now_ms)
            .min_by(|a, b| a.next_due_ms.total_cmp(&b.next_due_ms))?;

        let behind = ((now_ms - task.next_due_ms) / task.period_ms).floor();
        if behind >= MAX_CATCH_UP_RUNS as f64 {
            log::debug!("{:?} skipped {} missed runs", task.kind, behind);
            task.next_due_ms = now_ms;
        }

        let due = task.next_due_ms;
        task.next_due_ms += task.period_ms;
        Some((task.kind, due))
    }

    /// Earliest pending deadline, if any
    pub fn next_deadline(&self) -> Option<f64> {
        if self.stopped {
            return None;
        }
        self.tasks
            .iter()
            .map(|t| t.next_due_ms)
            .min_by(|a, b| a.total_cmp(b))
    }

    /// Cancel every task; `pop_due` returns `None` from now on
    pub fn stop(&mut self) {
        self.stopped = true;
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }
}
