//! Tick-driven timers
//!
//! Repeating and one-shot timers advance with every frame, paused or not.
//! Whether a fired task actually does anything is decided by its handler,
//! which checks the game phase. Clearing the scheduler invalidates every
//! pending task at once.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Work a timer triggers when it comes due
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Task {
    /// Regular spawn roll (repeating)
    SpawnTick,
    /// Wave advance (repeating)
    WaveTick,
    /// One enemy of a staggered wave batch
    BatchSpawn,
    /// Post-boss cleanup and wave transition
    BossClear,
    /// Deferred elite upgrade offer
    EliteOffer,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Timer {
    task: Task,
    due: u64,
    period: Option<u64>,
    seq: u64,
}

/// Frame-counting scheduler
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scheduler {
    now: u64,
    seq: u64,
    timers: Vec<Timer>,
}

/// Convert a wall-clock cadence to whole ticks (at least one)
pub fn ms_to_ticks(ms: f32) -> u64 {
    ((ms / MS_PER_TICK).round() as u64).max(1)
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ticks elapsed since the scheduler was created
    pub fn now(&self) -> u64 {
        self.now
    }

    /// Drop every pending timer
    pub fn clear(&mut self) {
        self.timers.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Number of pending timers for a task
    pub fn pending(&self, task: Task) -> usize {
        self.timers.iter().filter(|t| t.task == task).count()
    }

    /// Ticks until the next firing of a task, if one is pending
    pub fn remaining(&self, task: Task) -> Option<u64> {
        self.timers
            .iter()
            .filter(|t| t.task == task)
            .map(|t| t.due.saturating_sub(self.now))
            .min()
    }

    /// Fire `task` every `period` ticks
    pub fn every(&mut self, task: Task, period: u64) {
        let period = period.max(1);
        self.push(task, self.now + period, Some(period));
    }

    /// Fire `task` once after `delay` ticks
    pub fn after(&mut self, task: Task, delay: u64) {
        self.push(task, self.now + delay.max(1), None);
    }

    /// Arm the repeating timers of a run
    pub fn arm_run_timers(&mut self) {
        self.every(Task::SpawnTick, ms_to_ticks(ENEMY_SPAWN_INTERVAL_MS));
        self.every(Task::WaveTick, ms_to_ticks(WAVE_DURATION_MS));
    }

    /// Restart a repeating task's period from now
    pub fn restart(&mut self, task: Task) {
        let now = self.now;
        for timer in self.timers.iter_mut().filter(|t| t.task == task) {
            if let Some(period) = timer.period {
                timer.due = now + period;
            }
        }
    }

    fn push(&mut self, task: Task, due: u64, period: Option<u64>) {
        self.seq += 1;
        self.timers.push(Timer {
            task,
            due,
            period,
            seq: self.seq,
        });
    }

    /// Advance one tick and return the tasks that came due, oldest first
    pub fn advance(&mut self) -> Vec<Task> {
        self.now += 1;
        let now = self.now;

        let mut due: Vec<(u64, u64, Task)> = Vec::new();
        self.timers.retain_mut(|timer| {
            if timer.due > now {
                return true;
            }
            due.push((timer.due, timer.seq, timer.task));
            match timer.period {
                Some(period) => {
                    timer.due = now + period;
                    true
                }
                None => false,
            }
        });

        due.sort_by_key(|&(at, seq, _)| (at, seq));
        due.into_iter().map(|(_, _, task)| task).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ms_to_ticks() {
        assert_eq!(ms_to_ticks(ENEMY_SPAWN_INTERVAL_MS), 48);
        assert_eq!(ms_to_ticks(WAVE_DURATION_MS), 1200);
        assert_eq!(ms_to_ticks(BATCH_SPAWN_STAGGER_MS), 12);
        assert_eq!(ms_to_ticks(BOSS_CLEAR_DELAY_MS), 120);
        assert_eq!(ms_to_ticks(0.0), 1);
    }

    #[test]
    fn test_repeating_timer_fires_every_period() {
        let mut sched = Scheduler::new();
        sched.every(Task::SpawnTick, 3);
        let fired: Vec<usize> = (0..9).map(|_| sched.advance().len()).collect();
        assert_eq!(fired, vec![0, 0, 1, 0, 0, 1, 0, 0, 1]);
        assert_eq!(sched.pending(Task::SpawnTick), 1);
    }

    #[test]
    fn test_one_shot_fires_once_in_order() {
        let mut sched = Scheduler::new();
        sched.after(Task::BossClear, 2);
        sched.after(Task::BatchSpawn, 2);
        sched.after(Task::EliteOffer, 1);

        assert_eq!(sched.advance(), vec![Task::EliteOffer]);
        assert_eq!(sched.advance(), vec![Task::BossClear, Task::BatchSpawn]);
        assert!(sched.advance().is_empty());
        assert!(sched.is_empty());
    }

    #[test]
    fn test_clear_invalidates_pending() {
        let mut sched = Scheduler::new();
        sched.arm_run_timers();
        sched.after(Task::BossClear, 5);
        sched.clear();
        for _ in 0..2000 {
            assert!(sched.advance().is_empty());
        }
    }

    #[test]
    fn test_restart_pushes_back_due_time() {
        let mut sched = Scheduler::new();
        sched.every(Task::WaveTick, 10);
        for _ in 0..8 {
            sched.advance();
        }
        assert_eq!(sched.remaining(Task::WaveTick), Some(2));
        sched.restart(Task::WaveTick);
        assert_eq!(sched.remaining(Task::WaveTick), Some(10));
    }
}
