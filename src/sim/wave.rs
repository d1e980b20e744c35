//! Wave generation
//!
//! A wave is one addition problem with a handful of candidate answers, of
//! which exactly one is correct.

use std::collections::BTreeSet;

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::consts::BUBBLE_SLOTS;

/// Largest operand value (inclusive)
pub const MAX_OPERAND: i32 = 9;
/// Wrong answers sit within this distance of the correct one
pub const MAX_OFFSET: i32 = 2;

/// One round's problem and its shuffled candidate answers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wave {
    /// Monotonic wave id (bubble slots are re-initialized when it changes)
    pub id: u64,
    pub operand_a: i32,
    pub operand_b: i32,
    pub correct_answer: i32,
    pub candidates: [i32; BUBBLE_SLOTS],
    pub correct_index: usize,
}

impl Wave {
    /// Rendered equation for a slot, e.g. "3 + 4 = 7"
    pub fn label(&self, slot: usize) -> String {
        format!(
            "{} + {} = {}",
            self.operand_a, self.operand_b, self.candidates[slot]
        )
    }

    /// Labels for every slot in order
    pub fn labels(&self) -> [String; BUBBLE_SLOTS] {
        std::array::from_fn(|slot| self.label(slot))
    }

    #[inline]
    pub fn is_correct(&self, slot: usize) -> bool {
        slot == self.correct_index
    }
}

/// Build a wave from the given RNG.
///
/// Wrong answers are `correct + offset` with offset in [-2, 2] \ {0}. The
/// candidate set dedups, so a repeated offset simply draws again until the
/// set is full.
pub fn generate_wave<R: Rng>(rng: &mut R, id: u64) -> Wave {
    let operand_a = rng.random_range(0..=MAX_OPERAND);
    let operand_b = rng.random_range(0..=MAX_OPERAND);
    let correct_answer = operand_a + operand_b;

    let mut values = BTreeSet::new();
    values.insert(correct_answer);
    while values.len() < BUBBLE_SLOTS {
        let offset = rng.random_range(-MAX_OFFSET..=MAX_OFFSET);
        if offset == 0 {
            continue;
        }
        values.insert(correct_answer + offset);
    }

    let mut shuffled: Vec<i32> = values.into_iter().collect();
    shuffled.shuffle(rng);

    let mut candidates = [0; BUBBLE_SLOTS];
    candidates.copy_from_slice(&shuffled);
    let correct_index = candidates
        .iter()
        .position(|&v| v == correct_answer)
        .unwrap_or_default();

    Wave {
        id,
        operand_a,
        operand_b,
        correct_answer,
        candidates,
        correct_index,
    }
}
