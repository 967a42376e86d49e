//! Greedy nearest-candidate assignment with a completeness bias.
//!
//! Not an optimal bipartite matching: voices are served in index order and
//! each takes the unused candidate with the lowest adjusted cost, where a
//! candidate supplying a required pitch class is cheaper by a fixed bonus.
//! The reported cost sums the unadjusted distances.

use crate::error::Result;
use crate::solver::matrix::DistanceMatrix;
use crate::solver::{Problem, Solution, Solver};
use crate::types::calculation::{VoiceMove, Warning};
use crate::types::pitch::{reduce, Pitch, PitchClass};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GreedySolver {
    pub bonus: u32,
}

impl GreedySolver {
    pub fn new(bonus: u32) -> Self {
        Self { bonus }
    }
}

/// Distance minus the bonus when the candidate's pitch class is required
pub(crate) fn adjusted_cost(
    distance: u32,
    candidate: Pitch,
    required: &[PitchClass],
    bonus: u32,
) -> i64 {
    if required.contains(&reduce(candidate)) {
        distance as i64 - bonus as i64
    } else {
        distance as i64
    }
}

impl Solver for GreedySolver {
    fn name(&self) -> &'static str {
        "greedy"
    }

    fn solve(&self, problem: &Problem<'_>) -> Result<Solution> {
        let matrix = DistanceMatrix::between(problem.current, problem.candidates);
        let mut used = vec![false; problem.candidates.len()];
        let mut moves = Vec::with_capacity(problem.current.len());
        let mut warnings = Vec::new();
        let mut cost = 0u32;

        for (voice, &pitch) in problem.current.iter().enumerate() {
            let mut best: Option<(usize, i64)> = None;

            for (slot, &candidate) in problem.candidates.iter().enumerate() {
                if used[slot] {
                    continue;
                }
                let distance = matrix.row(voice)[slot];
                let adjusted = adjusted_cost(distance, candidate, problem.required, self.bonus);
                // Strict comparison: the lowest slot wins ties
                if best.map_or(true, |(_, lowest)| adjusted < lowest) {
                    best = Some((slot, adjusted));
                }
            }

            match best {
                Some((slot, _)) => {
                    used[slot] = true;
                    cost = cost.saturating_add(matrix.row(voice)[slot]);
                    let to = problem.candidates[slot];
                    debug!(voice, from = pitch, to, running_cost = cost, "voice assigned");
                    moves.push(VoiceMove::assigned(voice, pitch, to, slot));
                }
                None => {
                    warnings.push(Warning::UnassignableVoice { voice, pitch });
                    moves.push(VoiceMove::retained(voice, pitch));
                }
            }
        }

        Ok(Solution {
            moves,
            cost,
            warnings,
        })
    }
}
