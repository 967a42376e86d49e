//! Non-bijective alignment of pitch-class sets
//!
//! Handles chords whose sizes differ. Both sides are reduced to sorted,
//! deduplicated pitch-class sets and aligned with an edit-distance style
//! cumulative cost matrix, `M[i][j] = d(source[j], target[i]) + min(up,
//! left, diagonal)`, where `d` is the interval-class distance. Every
//! rotation of the target is tried and the one with the lowest final cell
//! wins. A backtrack from the final cell recovers the source/target pairs.

use crate::error::{Result, VoiceLeadingError};
use crate::solver::permutations::rotations;
use crate::solver::{Problem, Solution, Solver};
use crate::types::calculation::{VoiceMove, Warning};
use crate::types::pitch::{reduce, Pitch, PitchClass};
use tracing::trace;

/// Result of aligning two pitch-class sets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alignment {
    /// Index of the winning target rotation
    pub rotation: usize,
    pub source: Vec<PitchClass>,
    /// Target set in the winning rotation
    pub target: Vec<PitchClass>,
    /// Cumulative costs, one row per target element
    pub matrix: Vec<Vec<u32>>,
    /// `(target index, source index)` cells from `[0][0]` to the final cell
    pub path: Vec<(usize, usize)>,
    /// `(source, target)` pitch classes along the path
    pub pairs: Vec<(PitchClass, PitchClass)>,
    pub cost: u32,
}

fn dedup_sorted(pcs: &[PitchClass]) -> Vec<PitchClass> {
    let mut set = pcs.to_vec();
    set.sort();
    set.dedup();
    set
}

fn cumulative_matrix(source: &[PitchClass], target: &[PitchClass]) -> Vec<Vec<u32>> {
    let mut matrix = vec![vec![0u32; source.len()]; target.len()];

    for i in 0..target.len() {
        for j in 0..source.len() {
            let distance = source[j].distance(target[i]) as u32;
            let previous = match (i, j) {
                (0, 0) => 0,
                (0, _) => matrix[0][j - 1],
                (_, 0) => matrix[i - 1][0],
                _ => matrix[i - 1][j]
                    .min(matrix[i][j - 1])
                    .min(matrix[i - 1][j - 1]),
            };
            matrix[i][j] = distance + previous;
        }
    }
    matrix
}

fn backtrack(matrix: &[Vec<u32>]) -> Vec<(usize, usize)> {
    let mut i = matrix.len() - 1;
    let mut j = matrix[0].len() - 1;
    let mut path = vec![(i, j)];

    while i > 0 || j > 0 {
        if i == 0 {
            j -= 1;
        } else if j == 0 {
            i -= 1;
        } else {
            let diagonal = matrix[i - 1][j - 1];
            let left = matrix[i][j - 1];
            let up = matrix[i - 1][j];
            if diagonal <= left && diagonal <= up {
                i -= 1;
                j -= 1;
            } else if left <= up {
                j -= 1;
            } else {
                i -= 1;
            }
        }
        path.push((i, j));
    }

    path.reverse();
    path
}

/// Align two pitch-class collections. Returns `None` when either is empty.
pub fn align(source: &[PitchClass], target: &[PitchClass]) -> Option<Alignment> {
    let source = dedup_sorted(source);
    let target = dedup_sorted(target);
    if source.is_empty() || target.is_empty() {
        return None;
    }

    let mut best: Option<(usize, Vec<PitchClass>, Vec<Vec<u32>>, u32)> = None;

    for (rotation, rotated) in rotations(&target).into_iter().enumerate() {
        let matrix = cumulative_matrix(&source, &rotated);
        let cost = matrix[rotated.len() - 1][source.len() - 1];
        trace!(rotation, cost, "aligner rotation");

        if best.as_ref().map_or(true, |(_, _, _, lowest)| cost < *lowest) {
            best = Some((rotation, rotated, matrix, cost));
        }
    }

    let (rotation, target, matrix, cost) = best?;
    let path = backtrack(&matrix);
    let pairs = path.iter().map(|&(i, j)| (source[j], target[i])).collect();

    Some(Alignment {
        rotation,
        source,
        target,
        matrix,
        path,
        pairs,
        cost,
    })
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AlignerSolver;

impl AlignerSolver {
    /// Move each voice along the alignment pairs.
    ///
    /// Pairs are served in path order. Each takes the unused voice of its
    /// source pitch class closest to the pitch the previous pair moved to;
    /// the first pair takes the lowest such voice. Voices left over follow
    /// the first pair of their pitch class.
    fn realize(current: &[Pitch], alignment: &Alignment) -> (Vec<VoiceMove>, Vec<Warning>) {
        let mut moves: Vec<Option<VoiceMove>> = vec![None; current.len()];
        let mut previous = Pitch::MIN;

        for (slot, &(from_pc, to_pc)) in alignment.pairs.iter().enumerate() {
            let voice = (0..current.len())
                .filter(|&v| moves[v].is_none() && reduce(current[v]) == from_pc)
                .min_by_key(|&v| (current[v].abs_diff(previous), v));
            if let Some(voice) = voice {
                let pitch = current[voice];
                let to = pitch.saturating_add(from_pc.signed_interval_to(to_pc));
                moves[voice] = Some(VoiceMove::assigned(voice, pitch, to, slot));
                previous = to;
            }
        }

        let mut warnings = Vec::new();
        let moves = moves
            .into_iter()
            .enumerate()
            .map(|(voice, movement)| {
                if let Some(movement) = movement {
                    return movement;
                }
                let pitch = current[voice];
                let pc = reduce(pitch);
                match alignment.pairs.iter().position(|&(from, _)| from == pc) {
                    Some(slot) => {
                        let path = pc.signed_interval_to(alignment.pairs[slot].1);
                        let to = pitch.saturating_add(path);
                        VoiceMove::assigned(voice, pitch, to, slot)
                    }
                    None => {
                        warnings.push(Warning::UnassignableVoice { voice, pitch });
                        VoiceMove::retained(voice, pitch)
                    }
                }
            })
            .collect();

        (moves, warnings)
    }
}

impl Solver for AlignerSolver {
    fn name(&self) -> &'static str {
        "aligner"
    }

    fn solve(&self, problem: &Problem<'_>) -> Result<Solution> {
        let source: Vec<PitchClass> = problem.current.iter().map(|&p| reduce(p)).collect();
        let target: Vec<PitchClass> = problem.candidates.iter().map(|&p| reduce(p)).collect();

        let alignment = align(&source, &target).ok_or(VoiceLeadingError::EmptyInput {
            what: if source.is_empty() { "chord" } else { "target" },
        })?;
        let (moves, warnings) = Self::realize(problem.current, &alignment);

        Ok(Solution {
            moves,
            cost: alignment.cost,
            warnings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::pitch::canonicalize;

    fn pcs(values: &[i32]) -> Vec<PitchClass> {
        values.iter().map(|&v| reduce(v)).collect()
    }

    fn solve(current: &[Pitch], target: &[Pitch]) -> Solution {
        let required = canonicalize(target);
        AlignerSolver
            .solve(&Problem {
                current,
                candidates: target,
                required: &required,
            })
            .unwrap()
    }

    #[test]
    fn test_doubled_root_aligns_for_free() {
        let solution = solve(&[48, 52, 55, 60], &[0, 4, 7]);
        assert_eq!(solution.cost, 0);
        assert_eq!(solution.output(), vec![48, 52, 55, 60]);
        assert!(solution.warnings.is_empty());
    }

    #[test]
    fn test_identity_path_is_diagonal() {
        let alignment = align(&pcs(&[0, 4, 7]), &pcs(&[0, 4, 7])).unwrap();
        assert_eq!(alignment.rotation, 0);
        assert_eq!(alignment.path, vec![(0, 0), (1, 1), (2, 2)]);
        assert_eq!(alignment.cost, 0);
    }

    #[test]
    fn test_cumulative_first_row_and_column() {
        let matrix = cumulative_matrix(&pcs(&[0, 4, 7]), &pcs(&[0, 4, 7]));
        assert_eq!(matrix[0], vec![0, 4, 9]);
        assert_eq!(matrix[1][0], 4);
        assert_eq!(matrix[2][0], 9);
        assert_eq!(matrix[2][2], 0);
    }

    #[test]
    fn test_unequal_sizes_cover_every_cell_on_both_axes() {
        let alignment = align(&pcs(&[0, 4, 7]), &pcs(&[2, 5, 7, 11])).unwrap();
        let sources: Vec<usize> = alignment.path.iter().map(|&(_, j)| j).collect();
        let targets: Vec<usize> = alignment.path.iter().map(|&(i, _)| i).collect();
        assert_eq!(alignment.path.first(), Some(&(0, 0)));
        assert_eq!(alignment.path.last(), Some(&(3, 2)));
        for j in 0..3 {
            assert!(sources.contains(&j));
        }
        for i in 0..4 {
            assert!(targets.contains(&i));
        }
        assert!(alignment.path.len() >= 4 && alignment.path.len() <= 6);
    }

    #[test]
    fn test_duplicates_are_removed() {
        let alignment = align(&pcs(&[0, 12, 4, 7]), &pcs(&[7, 7, 0])).unwrap();
        assert_eq!(alignment.source, pcs(&[0, 4, 7]));
        assert_eq!(alignment.target.len(), 2);
    }

    #[test]
    fn test_three_voices_into_four_classes() {
        // C E G -> G B D F: every voice moves, at most one class is lost
        let solution = solve(&[48, 52, 55], &[7, 11, 2, 5]);
        assert_eq!(solution.moves.len(), 3);
        assert!(solution.moves.iter().all(|m| m.is_assigned()));
        for movement in &solution.moves {
            assert!(movement.semitones().abs() <= 6);
        }
    }

    #[test]
    fn test_repeated_source_class_takes_nearest_voice() {
        // One source class spread over three targets: the lowest C keeps
        // the root and the remaining Cs are taken nearest first
        let solution = solve(&[72, 48, 60], &[0, 4, 7]);
        assert_eq!(solution.output(), vec![67, 48, 64]);
        assert_eq!(solution.cost, 9);
        assert_eq!(solution.moves[1].slot, Some(0));
        assert_eq!(solution.moves[2].slot, Some(1));
        assert_eq!(solution.moves[0].slot, Some(2));
    }

    #[test]
    fn test_empty_target_is_rejected() {
        let result = AlignerSolver.solve(&Problem {
            current: &[60],
            candidates: &[],
            required: &[],
        });
        assert_eq!(result, Err(VoiceLeadingError::EmptyInput { what: "target" }));
    }
}
