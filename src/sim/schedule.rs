//! Generation-tagged delayed effects
//!
//! Every timed side effect (respawn sequencing, the game-over sting, the New
//! Game pre-roll) is an entry here rather than an opaque platform timer. A
//! restart bumps the session generation, so anything scheduled by a previous
//! session can never mutate the fresh one: stale entries are dropped on
//! drain instead of firing.

/// A one-shot deferred action applied by [`run_task`](super::tick::run_task)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    /// Play the respawn warning cue
    RespawnCue,
    /// Reposition the ball at a fresh spawn spot
    Respawn,
    /// Restore ball velocity after a respawn
    Relaunch,
    /// Play the game-over sting
    GameOverCue,
    /// End the pre-roll and start ticking
    BeginPlay,
}

#[derive(Debug, Clone)]
struct Entry {
    due_ms: f64,
    generation: u32,
    task: Task,
}

/// Cancellable delayed-effect registry
///
/// Driven from the frame loop: callers poll [`drain_due`](Self::drain_due)
/// with the current timestamp. Timestamps are milliseconds from any
/// monotonic-enough clock; only differences matter.
#[derive(Debug, Default)]
pub struct Scheduler {
    generation: u32,
    entries: Vec<Entry>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current session generation; bumped by [`cancel_all`](Self::cancel_all)
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Schedule `task` to fire `delay_ms` after `now_ms`, tagged with the
    /// current generation
    pub fn schedule_after(&mut self, now_ms: f64, delay_ms: f64, task: Task) {
        self.entries.push(Entry {
            due_ms: now_ms + delay_ms,
            generation: self.generation,
            task,
        });
    }

    /// Cancel every outstanding entry as a set by moving to a new generation
    pub fn cancel_all(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.entries.clear();
    }

    /// Remove and return all due tasks of the current generation, oldest
    /// first. Entries from older generations are silently discarded.
    pub fn drain_due(&mut self, now_ms: f64) -> Vec<Task> {
        let generation = self.generation;
        let mut due: Vec<Entry> = Vec::new();
        self.entries.retain(|e| {
            if e.generation != generation {
                return false;
            }
            if e.due_ms <= now_ms {
                due.push(e.clone());
                return false;
            }
            true
        });
        due.sort_by(|a, b| a.due_ms.total_cmp(&b.due_ms));
        due.into_iter().map(|e| e.task).collect()
    }

    /// Number of live (current-generation) pending entries
    pub fn pending(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.generation == self.generation)
            .count()
    }

    pub fn is_idle(&self) -> bool {
        self.pending() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_respects_due_time() {
        let mut sched = Scheduler::new();
        sched.schedule_after(0.0, 1000.0, Task::RespawnCue);
        sched.schedule_after(0.0, 2000.0, Task::Respawn);

        assert!(sched.drain_due(999.9).is_empty());
        assert_eq!(sched.drain_due(1000.0), vec![Task::RespawnCue]);
        assert_eq!(sched.pending(), 1);
        assert_eq!(sched.drain_due(5000.0), vec![Task::Respawn]);
        assert!(sched.is_idle());
    }

    #[test]
    fn test_drain_orders_by_due_time() {
        let mut sched = Scheduler::new();
        sched.schedule_after(0.0, 2000.0, Task::Respawn);
        sched.schedule_after(0.0, 1000.0, Task::RespawnCue);

        let due = sched.drain_due(3000.0);
        assert_eq!(due, vec![Task::RespawnCue, Task::Respawn]);
    }

    #[test]
    fn test_cancel_all_drops_pending() {
        let mut sched = Scheduler::new();
        sched.schedule_after(0.0, 1000.0, Task::RespawnCue);
        sched.schedule_after(0.0, 2000.0, Task::Respawn);

        let before = sched.generation();
        sched.cancel_all();
        assert_ne!(sched.generation(), before);
        assert!(sched.is_idle());
        assert!(sched.drain_due(10_000.0).is_empty());
    }

    #[test]
    fn test_new_generation_entries_fire_after_cancel() {
        let mut sched = Scheduler::new();
        sched.schedule_after(0.0, 1000.0, Task::Respawn);
        sched.cancel_all();
        sched.schedule_after(0.0, 500.0, Task::BeginPlay);

        assert_eq!(sched.drain_due(2000.0), vec![Task::BeginPlay]);
    }
}
