//! Orbifold distance: permutation search over concrete pitches
//!
//! Unlike the bijective solver this compares real pitches, folding each
//! voice's displacement through the octave: a voice moving `d` semitones
//! costs `min(d, |d - 12|)`.

use crate::error::{Result, VoiceLeadingError};
use crate::solver::permutations::orderings;
use crate::solver::{Problem, Solution, Solver};
use crate::types::calculation::VoiceMove;
use crate::types::pitch::{sorted_pitch_classes, Pitch, MODULUS};
use tracing::trace;

/// Cost of moving one voice by `distance` semitones with octave folding
fn folded(distance: u32) -> u32 {
    distance.min(distance.abs_diff(MODULUS as u32))
}

/// Minimal folded displacement between two equal-size chords.
///
/// Returns the total and the mapping: voice `i` of `source` moves to
/// `target[mapping[i]]`. Permutations are tried in lexicographic order and
/// the first minimum is kept.
pub fn orbifold_distance(
    source: &[Pitch],
    target: &[Pitch],
    ceiling: usize,
) -> Result<(u32, Vec<usize>)> {
    if source.len() != target.len() {
        return Err(VoiceLeadingError::SizeMismatch {
            current: source.len(),
            target: target.len(),
        });
    }
    if source.is_empty() {
        return Err(VoiceLeadingError::EmptyInput { what: "chord" });
    }
    let mut best: Option<(u32, Vec<usize>)> = None;

    for mapping in orderings(target.len(), ceiling)? {
        let total: u32 = source
            .iter()
            .zip(&mapping)
            .map(|(&from, &slot)| folded(from.abs_diff(target[slot])))
            .sum();
        if best.as_ref().map_or(true, |(lowest, _)| total < *lowest) {
            trace!(total, ?mapping, "orbifold improvement");
            best = Some((total, mapping));
        }
    }

    best.ok_or(VoiceLeadingError::EmptyInput { what: "chord" })
}

/// Spacing of a 4-voice chord in the normalized tetrahedral space: the
/// gaps between adjacent sorted pitch classes, transposed to start at 0,
/// in fractions of an octave. `None` for any other size.
pub fn geometric_coordinates(chord: &[Pitch]) -> Option<[f32; 3]> {
    if chord.len() != 4 {
        return None;
    }
    let pcs = sorted_pitch_classes(chord);
    let base = pcs[0].as_pitch();
    let normalized: Vec<i32> = pcs.iter().map(|pc| pc.as_pitch() - base).collect();
    let step = |k: usize| (normalized[k + 1] - normalized[k]) as f32 / MODULUS as f32;
    Some([step(0), step(1), step(2)])
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrbifoldSolver {
    pub ceiling: usize,
}

impl OrbifoldSolver {
    pub fn new(ceiling: usize) -> Self {
        Self { ceiling }
    }
}

impl Solver for OrbifoldSolver {
    fn name(&self) -> &'static str {
        "orbifold"
    }

    fn solve(&self, problem: &Problem<'_>) -> Result<Solution> {
        let (cost, mapping) = orbifold_distance(problem.current, problem.candidates, self.ceiling)?;

        let moves = problem
            .current
            .iter()
            .zip(&mapping)
            .enumerate()
            .map(|(voice, (&from, &slot))| {
                VoiceMove::assigned(voice, from, problem.candidates[slot], slot)
            })
            .collect();

        Ok(Solution {
            moves,
            cost,
            warnings: Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_folding() {
        assert_eq!(folded(0), 0);
        assert_eq!(folded(5), 5);
        assert_eq!(folded(11), 1);
        assert_eq!(folded(12), 0);
        assert_eq!(folded(14), 2);
    }

    #[test]
    fn test_identity_mapping() {
        let (cost, mapping) = orbifold_distance(&[48, 52, 55, 60], &[48, 52, 55, 60], 8).unwrap();
        assert_eq!(cost, 0);
        assert_eq!(mapping, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_octave_jump_folds_to_zero() {
        // 48 and 60 are both C; swapping them costs nothing after folding,
        // but the identity comes first
        let (cost, mapping) = orbifold_distance(&[48, 60], &[60, 48], 8).unwrap();
        assert_eq!(cost, 0);
        assert_eq!(mapping, vec![0, 1]);
    }

    #[test]
    fn test_finds_cheapest_permutation() {
        let (cost, mapping) = orbifold_distance(&[60, 64, 67], &[69, 65, 60], 8).unwrap();
        // 60->60, 64->65, 67->69
        assert_eq!(mapping, vec![2, 1, 0]);
        assert_eq!(cost, 3);
    }

    #[test]
    fn test_size_mismatch() {
        assert_eq!(
            orbifold_distance(&[60, 64], &[60], 8),
            Err(VoiceLeadingError::SizeMismatch {
                current: 2,
                target: 1
            })
        );
    }

    #[test]
    fn test_ceiling() {
        let chord: Vec<Pitch> = (60..70).collect();
        assert!(matches!(
            orbifold_distance(&chord, &chord, 8),
            Err(VoiceLeadingError::PermutationLimit { voices: 10, ceiling: 8 })
        ));
    }

    #[test]
    fn test_geometric_coordinates() {
        // C7: C E G Bb -> 0 4 7 10
        let coords = geometric_coordinates(&[48, 52, 55, 58]).unwrap();
        assert_eq!(coords, [4.0 / 12.0, 3.0 / 12.0, 3.0 / 12.0]);
        assert_eq!(geometric_coordinates(&[48, 52, 55]), None);
    }

    #[test]
    fn test_solver_outputs_concrete_targets() {
        let solution = OrbifoldSolver::new(8)
            .solve(&Problem {
                current: &[60, 64, 67],
                candidates: &[69, 65, 60],
                required: &[],
            })
            .unwrap();
        assert_eq!(solution.output(), vec![60, 65, 69]);
        assert_eq!(solution.cost, 3);
    }
}
