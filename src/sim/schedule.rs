//! One-shot delayed tasks driven by the session clock
//!
//! Tasks are never cancelled. Whatever they do must be safe to run late.

use serde::{Deserialize, Serialize};

/// Deferred actions the session can schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Task {
    /// Replace the current wave with a fresh one
    StartNextWave,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Pending {
    fire_at_ms: f64,
    /// Insertion order breaks ties between equal fire times
    seq: u64,
    task: Task,
}

/// Queue of tasks ordered by fire time
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scheduler {
    pending: Vec<Pending>,
    next_seq: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `task` once the clock reaches `now_ms + delay_ms`
    pub fn schedule(&mut self, now_ms: f64, delay_ms: f64, task: Task) {
        self.pending.push(Pending {
            fire_at_ms: now_ms + delay_ms,
            seq: self.next_seq,
            task,
        });
        self.next_seq += 1;
    }

    /// Remove and return every task due at `now_ms`, earliest first
    pub fn drain_due(&mut self, now_ms: f64) -> Vec<Task> {
        let mut due: Vec<Pending> = Vec::new();
        self.pending.retain(|p| {
            if p.fire_at_ms <= now_ms {
                due.push(p.clone());
                false
            } else {
                true
            }
        });
        due.sort_by(|a, b| a.fire_at_ms.total_cmp(&b.fire_at_ms).then(a.seq.cmp(&b.seq)));
        due.into_iter().map(|p| p.task).collect()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
