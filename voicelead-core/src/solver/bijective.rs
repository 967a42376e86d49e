//! Bijective voice leading by permutation search.
//!
//! Both chords are reduced to sorted pitch-class multisets of equal size.
//! Each alignment of the target against the source gives every voice a
//! signed interval-class path in `[-5, 6]`; the alignment with the smallest
//! sum of `|path|` wins (first found on ties). Paths are then applied to the
//! original, unreduced pitches.

use crate::config::BijectiveSearch;
use crate::error::{Result, VoiceLeadingError};
use crate::solver::permutations::{orderings, rotations};
use crate::solver::{Problem, Solution, Solver};
use crate::types::calculation::{VoiceMove, Warning};
use crate::types::pitch::{reduce, sorted_pitch_classes, PitchClass};
use tracing::trace;

/// The winning alignment: `paths[i]` moves `source[i]` onto `target[i]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BijectiveLeading {
    pub source: Vec<PitchClass>,
    pub target: Vec<PitchClass>,
    pub paths: Vec<i32>,
    pub cost: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BijectiveSolver {
    pub search: BijectiveSearch,
    pub ceiling: usize,
}

impl BijectiveSolver {
    pub fn new(search: BijectiveSearch, ceiling: usize) -> Self {
        Self { search, ceiling }
    }

    /// Find the cheapest alignment of two equal-size pitch-class sequences.
    /// Both are sorted first.
    pub fn search(&self, source: &[PitchClass], target: &[PitchClass]) -> Result<BijectiveLeading> {
        if source.len() != target.len() {
            return Err(VoiceLeadingError::SizeMismatch {
                current: source.len(),
                target: target.len(),
            });
        }
        if source.is_empty() {
            return Err(VoiceLeadingError::EmptyInput { what: "chord" });
        }

        let mut source = source.to_vec();
        source.sort();
        let mut target = target.to_vec();
        target.sort();

        let alignments: Vec<Vec<PitchClass>> = match self.search {
            BijectiveSearch::Rotations => rotations(&target),
            BijectiveSearch::Permutations => {
                orderings(target.len(), self.ceiling)?
                    .into_iter()
                    .map(|perm| perm.iter().map(|&i| target[i]).collect())
                    .collect()
            }
        };

        let mut best: Option<BijectiveLeading> = None;

        for (index, aligned) in alignments.into_iter().enumerate() {
            let paths: Vec<i32> = source
                .iter()
                .zip(&aligned)
                .map(|(from, &to)| from.signed_interval_to(to))
                .collect();
            let cost: u32 = paths.iter().map(|p| p.unsigned_abs()).sum();
            trace!(index, cost, ?paths, "bijective alignment");

            if best.as_ref().map_or(true, |b| cost < b.cost) {
                best = Some(BijectiveLeading {
                    source: source.clone(),
                    target: aligned,
                    paths,
                    cost,
                });
            }
        }

        best.ok_or(VoiceLeadingError::EmptyInput { what: "chord" })
    }
}

impl Solver for BijectiveSolver {
    fn name(&self) -> &'static str {
        "bijective"
    }

    fn solve(&self, problem: &Problem<'_>) -> Result<Solution> {
        let source = sorted_pitch_classes(problem.current);
        let target = sorted_pitch_classes(problem.candidates);
        let leading = self.search(&source, &target)?;

        let mut used = vec![false; leading.paths.len()];
        let mut moves = Vec::with_capacity(problem.current.len());
        let mut warnings = Vec::new();

        for (voice, &pitch) in problem.current.iter().enumerate() {
            let pc = reduce(pitch);
            let matched = (0..leading.paths.len()).find(|&j| !used[j] && leading.source[j] == pc);
            match matched {
                Some(j) => {
                    used[j] = true;
                    let to = pitch.saturating_add(leading.paths[j]);
                    moves.push(VoiceMove::assigned(voice, pitch, to, j));
                }
                None => {
                    warnings.push(Warning::UnassignableVoice { voice, pitch });
                    moves.push(VoiceMove::retained(voice, pitch));
                }
            }
        }

        Ok(Solution {
            moves,
            cost: leading.cost,
            warnings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::pitch::{canonicalize, Pitch};

    fn solve(search: BijectiveSearch, current: &[Pitch], target: &[Pitch]) -> Result<Solution> {
        let required = canonicalize(target);
        BijectiveSolver::new(search, 8).solve(&Problem {
            current,
            candidates: target,
            required: &required,
        })
    }

    #[test]
    fn test_identity_costs_nothing() {
        let solution = solve(BijectiveSearch::Rotations, &[60, 64, 67], &[0, 4, 7]).unwrap();
        assert_eq!(solution.cost, 0);
        assert_eq!(solution.output(), vec![60, 64, 67]);
    }

    #[test]
    fn test_c_major_to_f_major_by_rotation() {
        // C E G -> C F A: G->A (+2), E->F (+1), C stays
        let solution = solve(BijectiveSearch::Rotations, &[60, 64, 67], &[5, 9, 0]).unwrap();
        assert_eq!(solution.cost, 3);
        assert_eq!(solution.output(), vec![60, 65, 69]);
    }

    #[test]
    fn test_paths_follow_original_voice_order() {
        // Same chord, voices out of order and spread over octaves
        let solution = solve(BijectiveSearch::Rotations, &[67, 48, 76], &[5, 9, 0]).unwrap();
        assert_eq!(solution.output(), vec![69, 48, 77]);
    }

    #[test]
    fn test_doubled_pitch_classes_use_first_unused_path() {
        let solution = solve(BijectiveSearch::Rotations, &[48, 52, 55, 60], &[2, 6, 9, 2]).unwrap();
        assert_eq!(solution.output().len(), 4);
        assert!(solution.warnings.is_empty());
        let moved: u32 = solution.moves.iter().map(|m| m.semitones().unsigned_abs()).sum();
        assert_eq!(moved, solution.cost);
    }

    #[test]
    fn test_permutation_search_never_worse_than_rotations() {
        let current = [48, 50, 55, 59];
        let target = [1, 3, 6, 11];
        let rotations = solve(BijectiveSearch::Rotations, &current, &target).unwrap();
        let permutations = solve(BijectiveSearch::Permutations, &current, &target).unwrap();
        assert!(permutations.cost <= rotations.cost);
    }

    #[test]
    fn test_size_mismatch_is_rejected() {
        let result = solve(BijectiveSearch::Rotations, &[48, 52, 55, 60], &[2, 6, 9]);
        assert_eq!(
            result,
            Err(VoiceLeadingError::SizeMismatch {
                current: 4,
                target: 3
            })
        );
    }

    #[test]
    fn test_tritone_path_is_positive() {
        let solver = BijectiveSolver::new(BijectiveSearch::Rotations, 8);
        let leading = solver.search(&[reduce(0)], &[reduce(6)]).unwrap();
        assert_eq!(leading.paths, vec![6]);
        assert_eq!(leading.cost, 6);
    }
}
