use proptest::prelude::*;
use voicelead_core::config::{BijectiveSearch, OctaveRange};
use voicelead_core::solver::permutations::orderings;
use voicelead_core::solver::{align, BijectiveSolver};
use voicelead_core::types::{canonicalize, reduce, PitchClass};
use voicelead_core::voicing::generate_voicings;
use voicelead_core::{Session, SessionConfig, Strategy as LeadingStrategy};

fn pitch_classes(values: &[i32]) -> Vec<PitchClass> {
    values.iter().map(|&v| reduce(v)).collect()
}

fn brute_force_cost(source: &[PitchClass], target: &[PitchClass]) -> u32 {
    orderings(target.len(), 8)
        .unwrap()
        .iter()
        .map(|perm| {
            source
                .iter()
                .zip(perm)
                .map(|(s, &t)| s.signed_interval_to(target[t]).unsigned_abs())
                .sum::<u32>()
        })
        .min()
        .unwrap_or(0)
}

fn equal_size_chords() -> impl Strategy<Value = (Vec<i32>, Vec<i32>)> {
    (1usize..=4).prop_flat_map(|n| {
        (
            prop::collection::vec(0i32..12, n),
            prop::collection::vec(0i32..12, n),
        )
    })
}

proptest! {
    #[test]
    fn reduce_is_octave_invariant(p in -1000i32..1000) {
        prop_assert_eq!(reduce(p), reduce(p + 12));
        prop_assert!(reduce(p).value() < 12);
    }

    #[test]
    fn signed_interval_stays_in_range(a in 0i32..12, b in 0i32..12) {
        let d = reduce(a).signed_interval_to(reduce(b));
        prop_assert!((-5..=6).contains(&d));
        prop_assert_eq!(reduce(a + d), reduce(b));
    }

    #[test]
    fn permutation_search_matches_brute_force((source, target) in equal_size_chords()) {
        let source = pitch_classes(&source);
        let target = pitch_classes(&target);
        let solver = BijectiveSolver::new(BijectiveSearch::Permutations, 8);
        let leading = solver.search(&source, &target).unwrap();
        prop_assert_eq!(leading.cost, brute_force_cost(&source, &target));
    }

    #[test]
    fn rotations_never_beat_permutations((source, target) in equal_size_chords()) {
        let source = pitch_classes(&source);
        let target = pitch_classes(&target);
        let rotations = BijectiveSolver::new(BijectiveSearch::Rotations, 8)
            .search(&source, &target)
            .unwrap();
        let permutations = BijectiveSolver::new(BijectiveSearch::Permutations, 8)
            .search(&source, &target)
            .unwrap();
        prop_assert!(rotations.cost >= permutations.cost);
    }

    #[test]
    fn aligner_path_is_monotone(
        source in prop::collection::vec(0i32..12, 1..=6),
        target in prop::collection::vec(0i32..12, 1..=6),
    ) {
        let alignment = align(&pitch_classes(&source), &pitch_classes(&target)).unwrap();
        let s = alignment.source.len();
        let t = alignment.target.len();

        prop_assert_eq!(alignment.path.first().copied(), Some((0, 0)));
        prop_assert_eq!(alignment.path.last().copied(), Some((t - 1, s - 1)));
        prop_assert!(alignment.path.len() >= s.max(t));
        prop_assert!(alignment.path.len() <= s + t - 1);
        prop_assert_eq!(alignment.pairs.len(), alignment.path.len());

        for step in alignment.path.windows(2) {
            let (i0, j0) = step[0];
            let (i1, j1) = step[1];
            prop_assert!(i1 - i0 <= 1 && j1 - j0 <= 1 && (i1, j1) != (i0, j0));
            prop_assert!(alignment.matrix[i1][j1] >= alignment.matrix[i0][j0]);
        }
        prop_assert_eq!(alignment.cost, alignment.matrix[t - 1][s - 1]);
    }

    #[test]
    fn voicings_cover_every_required_class(
        octave in 2i32..=4,
        target in prop::collection::vec(0i32..12, 1..=6),
        cap in 1usize..=16,
    ) {
        let target = pitch_classes(&target);
        let voicings = generate_voicings(octave, &target, OctaveRange::new(2, 4), cap);
        prop_assert!(voicings.is_complete());
        prop_assert_eq!(voicings.candidates.len() % target.len(), 0);
        for pc in &target {
            prop_assert!(voicings.candidates.iter().any(|&p| reduce(p) == *pc));
        }
    }

    #[test]
    fn feedback_chains_output_into_current(
        current in prop::collection::vec(36i32..84, 1..=6),
        target in prop::collection::vec(0i32..12, 1..=6),
    ) {
        let mut session = Session::new(SessionConfig::default().with_strategy(LeadingStrategy::Aligner)).unwrap();
        session.set_current_chord(&current).unwrap();
        let calculation = session.set_target_absolute(&target).unwrap().unwrap();
        prop_assert_eq!(calculation.output.len(), current.len());
        prop_assert_eq!(session.current(), calculation.output.as_slice());
        prop_assert!(canonicalize(&calculation.output).len() <= canonicalize(&target).len());
    }
}
