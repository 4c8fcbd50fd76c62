use crate::domain::TaskId;
use std::time::{Duration, Instant};

/// Default tick interval in milliseconds
pub const DEFAULT_TICK_MS: u64 = 1000;

/// Get the default tick duration
pub fn tick_duration() -> Duration {
    Duration::from_millis(DEFAULT_TICK_MS)
}

/// Elapsed seconds computed for the running task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Elapsed {
    pub task_id: TaskId,
    pub seconds: u64,
}

/// Observable state of the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    Idle,
    Running(TaskId),
}

/// Scheduled tick for the running task. Dropping it cancels the schedule.
#[derive(Debug, Clone, Copy)]
struct TickHandle {
    task_id: TaskId,
    /// Instant the current run started
    started_at: Instant,
    /// Seconds the task had accumulated before this run
    carried: u64,
    /// When the next tick is due
    next_due: Instant,
}

impl TickHandle {
    /// Baseline is `started_at - carried`, so elapsed is derived by
    /// subtraction and never drifts with late or missed ticks.
    fn elapsed_at(&self, now: Instant) -> u64 {
        self.carried + now.saturating_duration_since(self.started_at).as_secs()
    }

    /// First tick boundary after `now`, aligned to the run start
    fn next_boundary(&self, now: Instant, period: Duration) -> Instant {
        let since = now.saturating_duration_since(self.started_at).as_nanos();
        let period_ns = period.as_nanos().max(1);
        let ticks = since / period_ns + 1;
        let offset = u64::try_from(ticks * period_ns).unwrap_or(u64::MAX);
        self.started_at + Duration::from_nanos(offset)
    }
}

/// Drives elapsed-time accumulation for at most one task at a time
#[derive(Debug, Clone)]
pub struct TimerEngine {
    period: Duration,
    running: Option<TickHandle>,
}

impl Default for TimerEngine {
    fn default() -> Self {
        Self::new(tick_duration())
    }
}

impl TimerEngine {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            running: None,
        }
    }

    pub fn state(&self) -> TimerState {
        match self.running {
            Some(handle) => TimerState::Running(handle.task_id),
            None => TimerState::Idle,
        }
    }

    /// Start accruing time for `task_id`, continuing from `accumulated` seconds.
    /// Any previous schedule is cancelled first.
    pub fn start(&mut self, task_id: TaskId, accumulated: u64, now: Instant) {
        self.stop();
        self.running = Some(TickHandle {
            task_id,
            started_at: now,
            carried: accumulated,
            next_due: now + self.period,
        });
        tracing::debug!(task_id, accumulated, "timer started");
    }

    /// Cancel the pending tick and go idle. Returns the task that was running.
    pub fn stop(&mut self) -> Option<TaskId> {
        let stopped = self.running.take().map(|h| h.task_id);
        if let Some(task_id) = stopped {
            tracing::debug!(task_id, "timer stopped");
        }
        stopped
    }

    /// Elapsed seconds of the running task at `now`, regardless of schedule
    pub fn elapsed(&self, now: Instant) -> Option<Elapsed> {
        self.running.map(|h| Elapsed {
            task_id: h.task_id,
            seconds: h.elapsed_at(now),
        })
    }

    /// Fire the scheduled tick if it is due. Returns the recomputed elapsed
    /// time to propagate into the running task.
    pub fn tick(&mut self, now: Instant) -> Option<Elapsed> {
        let period = self.period;
        let handle = self.running.as_mut()?;
        if now < handle.next_due {
            return None;
        }

        handle.next_due = handle.next_boundary(now, period);
        Some(Elapsed {
            task_id: handle.task_id,
            seconds: handle.elapsed_at(now),
        })
    }

    /// Time the event loop may wait before the next tick is due
    pub fn until_next_tick(&self, now: Instant) -> Option<Duration> {
        self.running
            .map(|h| h.next_due.saturating_duration_since(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(n: u64) -> Duration {
        Duration::from_secs(n)
    }

    #[test]
    fn test_tick_duration() {
        assert_eq!(tick_duration(), Duration::from_millis(1000));
    }

    #[test]
    fn test_idle_engine_does_nothing() {
        let mut engine = TimerEngine::default();
        let now = Instant::now();
        assert_eq!(engine.state(), TimerState::Idle);
        assert_eq!(engine.tick(now + secs(5)), None);
        assert_eq!(engine.elapsed(now), None);
        assert_eq!(engine.until_next_tick(now), None);
        assert_eq!(engine.stop(), None);
    }

    #[test]
    fn test_tick_not_due_yet() {
        let mut engine = TimerEngine::default();
        let t0 = Instant::now();
        engine.start(1, 0, t0);
        assert_eq!(engine.tick(t0 + Duration::from_millis(400)), None);
        assert_eq!(
            engine.tick(t0 + secs(1)),
            Some(Elapsed {
                task_id: 1,
                seconds: 1
            })
        );
    }

    #[test]
    fn test_elapsed_is_drift_tolerant() {
        let t0 = Instant::now();

        // Every tick delivered
        let mut every = TimerEngine::default();
        every.start(1, 0, t0);
        let mut last = None;
        for s in 1..=125 {
            last = every.tick(t0 + secs(s));
        }
        assert_eq!(last.map(|e| e.seconds), Some(125));

        // Only a handful of late ticks delivered
        let mut sparse = TimerEngine::default();
        sparse.start(1, 0, t0);
        sparse.tick(t0 + Duration::from_millis(1700));
        sparse.tick(t0 + Duration::from_millis(61_300));
        let late = sparse.tick(t0 + secs(125));
        assert_eq!(late.map(|e| e.seconds), Some(125));

        // No tick at all
        let mut none = TimerEngine::default();
        none.start(1, 0, t0);
        assert_eq!(none.elapsed(t0 + secs(125)).map(|e| e.seconds), Some(125));
    }

    #[test]
    fn test_start_continues_from_accumulated() {
        let mut engine = TimerEngine::default();
        let t0 = Instant::now();
        engine.start(9, 40, t0);
        assert_eq!(engine.tick(t0 + secs(125)).map(|e| e.seconds), Some(165));
    }

    #[test]
    fn test_elapsed_floors_partial_seconds() {
        let mut engine = TimerEngine::default();
        let t0 = Instant::now();
        engine.start(1, 0, t0);
        let e = engine.elapsed(t0 + Duration::from_millis(2999)).unwrap();
        assert_eq!(e.seconds, 2);
    }

    #[test]
    fn test_next_tick_aligned_to_start() {
        let mut engine = TimerEngine::default();
        let t0 = Instant::now();
        engine.start(1, 0, t0);
        assert_eq!(engine.until_next_tick(t0), Some(secs(1)));

        // A late tick reschedules to the next whole-period boundary
        engine.tick(t0 + Duration::from_millis(3400));
        assert_eq!(
            engine.until_next_tick(t0 + Duration::from_millis(3400)),
            Some(Duration::from_millis(600))
        );
    }

    #[test]
    fn test_stop_cancels_pending_tick() {
        let mut engine = TimerEngine::default();
        let t0 = Instant::now();
        engine.start(1, 0, t0);
        assert_eq!(engine.stop(), Some(1));
        assert_eq!(engine.state(), TimerState::Idle);
        assert_eq!(engine.tick(t0 + secs(10)), None);
    }

    #[test]
    fn test_start_replaces_previous_schedule() {
        let mut engine = TimerEngine::default();
        let t0 = Instant::now();
        engine.start(1, 0, t0);
        engine.start(2, 7, t0 + secs(3));
        assert_eq!(engine.state(), TimerState::Running(2));

        let e = engine.tick(t0 + secs(5)).unwrap();
        assert_eq!(e.task_id, 2);
        assert_eq!(e.seconds, 9);
    }
}
