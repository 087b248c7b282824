//! The descending quality ladder and the budget search over it.

use serde::{Deserialize, Serialize};

use crate::types::Outcome;

/// Quality levels `start, start - step, ...` strictly above `floor`.
///
/// Every constructor, deserialization included, goes through [`QualityLadder::new`],
/// so the step is never zero and `levels()` always terminates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "LadderFields", into = "LadderFields")]
pub struct QualityLadder {
    start: u8,
    step: u8,
    floor: u8,
}

/// Serialized form of a ladder.
#[derive(Serialize, Deserialize)]
struct LadderFields {
    start: u8,
    step: u8,
    floor: u8,
}

impl From<LadderFields> for QualityLadder {
    fn from(fields: LadderFields) -> Self {
        Self::new(fields.start, fields.step, fields.floor)
    }
}

impl From<QualityLadder> for LadderFields {
    fn from(ladder: QualityLadder) -> Self {
        Self {
            start: ladder.start,
            step: ladder.step,
            floor: ladder.floor,
        }
    }
}

impl Default for QualityLadder {
    fn default() -> Self {
        Self::new(95, 5, 10)
    }
}

impl QualityLadder {
    /// Build a ladder. `start` is clamped to the encoder's 1..=100 range and a
    /// zero step is treated as 1.
    pub fn new(start: u8, step: u8, floor: u8) -> Self {
        Self {
            start: start.clamp(1, 100),
            step: step.max(1),
            floor,
        }
    }

    pub fn start(&self) -> u8 {
        self.start
    }

    pub fn step(&self) -> u8 {
        self.step
    }

    /// Exclusive lower bound.
    pub fn floor(&self) -> u8 {
        self.floor
    }

    /// Iterate the levels from highest to lowest.
    pub fn levels(&self) -> impl Iterator<Item = u8> {
        let step = self.step.max(1);
        let floor = self.floor;
        std::iter::successors(Some(self.start), move |&q| q.checked_sub(step))
            .take_while(move |&q| q > floor)
    }

    /// Number of levels, i.e. the most encode attempts one job can make.
    pub fn len(&self) -> usize {
        if self.start <= self.floor {
            return 0;
        }
        (self.start - self.floor).div_ceil(self.step.max(1)) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Result of walking the ladder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Search {
    pub outcome: Outcome,
    pub attempts: usize,
}

/// Walk `ladder` from the top, calling `attempt(quality)` for each level until
/// it returns a size strictly below `budget`.
///
/// Returns `Ok(None)` only for an empty ladder. Errors from `attempt` stop the
/// search immediately.
pub fn search<E>(
    ladder: &QualityLadder,
    budget: u64,
    mut attempt: impl FnMut(u8) -> Result<u64, E>,
) -> Result<Option<Search>, E> {
    let mut last = None;
    let mut attempts = 0;

    for quality in ladder.levels() {
        let size = attempt(quality)?;
        attempts += 1;
        tracing::debug!(quality, size, budget, "Encode attempt");

        if size < budget {
            return Ok(Some(Search {
                outcome: Outcome::Accepted { quality, size },
                attempts,
            }));
        }
        last = Some((quality, size));
    }

    Ok(last.map(|(quality, size)| Search {
        outcome: Outcome::Exhausted { quality, size },
        attempts,
    }))
}
