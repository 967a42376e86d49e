//! Optimal completeness-biased assignment.
//!
//! Minimizes the greedy solver's adjusted cost over every injective mapping
//! between voices and candidate slots. When there are more voices than
//! candidates, each candidate takes one voice and the rest keep their pitch.

use crate::error::Result;
use crate::solver::greedy::adjusted_cost;
use crate::solver::matrix::DistanceMatrix;
use crate::solver::permutations::injections;
use crate::solver::{Problem, Solution, Solver};
use crate::types::calculation::{VoiceMove, Warning};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExhaustiveSolver {
    pub bonus: u32,
    pub ceiling: usize,
}

impl ExhaustiveSolver {
    pub fn new(bonus: u32, ceiling: usize) -> Self {
        Self { bonus, ceiling }
    }
}

impl Solver for ExhaustiveSolver {
    fn name(&self) -> &'static str {
        "exhaustive"
    }

    fn solve(&self, problem: &Problem<'_>) -> Result<Solution> {
        let voices = problem.current.len();
        let slots = problem.candidates.len();
        let matrix = DistanceMatrix::between(problem.current, problem.candidates);
        let adjusted = |voice: usize, slot: usize| {
            adjusted_cost(
                matrix.row(voice)[slot],
                problem.candidates[slot],
                problem.required,
                self.bonus,
            )
        };

        // pairing[voice] = Some(slot)
        let mut best: Option<(i64, Vec<Option<usize>>)> = None;

        let pairings: Vec<Vec<Option<usize>>> = if voices <= slots {
            injections(voices, slots, self.ceiling)?
                .into_iter()
                .map(|perm| perm.into_iter().map(Some).collect())
                .collect()
        } else {
            injections(slots, voices, self.ceiling)?
                .into_iter()
                .map(|perm| {
                    let mut pairing = vec![None; voices];
                    for (slot, voice) in perm.into_iter().enumerate() {
                        pairing[voice] = Some(slot);
                    }
                    pairing
                })
                .collect()
        };

        for pairing in pairings {
            let total: i64 = pairing
                .iter()
                .enumerate()
                .filter_map(|(voice, slot)| slot.map(|s| adjusted(voice, s)))
                .sum();
            if best.as_ref().map_or(true, |(lowest, _)| total < *lowest) {
                best = Some((total, pairing));
            }
        }

        let pairing = best.map(|(_, p)| p).unwrap_or_else(|| vec![None; voices]);
        let mut moves = Vec::with_capacity(voices);
        let mut warnings = Vec::new();
        let mut cost = 0u32;

        for (voice, &pitch) in problem.current.iter().enumerate() {
            match pairing.get(voice).copied().flatten() {
                Some(slot) => {
                    cost = cost.saturating_add(matrix.row(voice)[slot]);
                    moves.push(VoiceMove::assigned(
                        voice,
                        pitch,
                        problem.candidates[slot],
                        slot,
                    ));
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
