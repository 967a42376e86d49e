//! Assignment solvers
//!
//! Every strategy answers the same question: given the current voices, the
//! target's candidate pitches and the pitch classes the result must
//! contain, which pitch should each voice move to and what does it cost?
//! They all sit behind the [`Solver`] trait and are chosen by [`Strategy`].

pub mod aligner;
pub mod bijective;
pub mod exhaustive;
pub mod greedy;
pub mod matrix;
pub mod orbifold;
pub mod permutations;

pub use aligner::{align, Alignment, AlignerSolver};
pub use bijective::{BijectiveLeading, BijectiveSolver};
pub use exhaustive::ExhaustiveSolver;
pub use greedy::GreedySolver;
pub use matrix::{DistanceMatrix, HIGH_COST};
pub use orbifold::{geometric_coordinates, orbifold_distance, OrbifoldSolver};

use crate::config::SessionConfig;
use crate::error::Result;
use crate::types::calculation::{VoiceMove, Warning};
use crate::types::pitch::{Pitch, PitchClass};
use std::fmt;

/// Which solver a session runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Strategy {
    /// Nearest candidate per voice with a completeness bonus
    #[default]
    Greedy,
    /// Same objective as greedy, optimal over every injective mapping
    Exhaustive,
    /// Equal-size pitch-class alignment by rotation or permutation search
    Bijective,
    /// Dynamic-programming alignment of unequal pitch-class sets
    Aligner,
    /// Bijective when sizes match, aligner otherwise
    Adaptive,
    /// Permutation search over concrete pitches with octave folding
    Orbifold,
}

impl Strategy {
    /// Parse a strategy name (case-insensitive)
    pub fn from_name(s: &str) -> Option<Strategy> {
        match s.to_lowercase().as_str() {
            "greedy" | "hungarian" => Some(Strategy::Greedy),
            "exhaustive" | "optimal" => Some(Strategy::Exhaustive),
            "bijective" | "permutation" => Some(Strategy::Bijective),
            "aligner" | "dp" | "nonbijective" => Some(Strategy::Aligner),
            "adaptive" | "auto" => Some(Strategy::Adaptive),
            "orbifold" => Some(Strategy::Orbifold),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Greedy => "greedy",
            Strategy::Exhaustive => "exhaustive",
            Strategy::Bijective => "bijective",
            Strategy::Aligner => "aligner",
            Strategy::Adaptive => "adaptive",
            Strategy::Orbifold => "orbifold",
        }
    }

    /// Strategies that need an anchor octave and generated voicings
    pub fn uses_voicings(&self) -> bool {
        matches!(self, Strategy::Greedy | Strategy::Exhaustive)
    }

    /// Build the solver for this strategy
    pub fn solver(&self, config: &SessionConfig) -> Box<dyn Solver> {
        match self {
            Strategy::Greedy => Box::new(GreedySolver::new(config.completeness_bonus)),
            Strategy::Exhaustive => Box::new(ExhaustiveSolver::new(
                config.completeness_bonus,
                config.permutation_ceiling,
            )),
            Strategy::Bijective => Box::new(BijectiveSolver::new(
                config.bijective_search,
                config.permutation_ceiling,
            )),
            Strategy::Aligner => Box::new(AlignerSolver),
            Strategy::Adaptive => Box::new(AdaptiveSolver {
                bijective: BijectiveSolver::new(
                    config.bijective_search,
                    config.permutation_ceiling,
                ),
            }),
            Strategy::Orbifold => Box::new(OrbifoldSolver::new(config.permutation_ceiling)),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Input to a solver. Pitch-class strategies read `candidates` modulo 12.
#[derive(Debug, Clone, Copy)]
pub struct Problem<'a> {
    pub current: &'a [Pitch],
    pub candidates: &'a [Pitch],
    pub required: &'a [PitchClass],
}

/// One move per current voice, in voice order, plus the total cost
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    pub moves: Vec<VoiceMove>,
    pub cost: u32,
    pub warnings: Vec<Warning>,
}

impl Solution {
    /// The output chord
    pub fn output(&self) -> Vec<Pitch> {
        self.moves.iter().map(|m| m.to).collect()
    }
}

pub trait Solver {
    fn name(&self) -> &'static str;

    fn solve(&self, problem: &Problem<'_>) -> Result<Solution>;
}

/// Routes equal-size problems to the bijective solver and everything else
/// to the aligner
#[derive(Debug, Clone, Copy)]
pub struct AdaptiveSolver {
    pub bijective: BijectiveSolver,
}

impl Solver for AdaptiveSolver {
    fn name(&self) -> &'static str {
        "adaptive"
    }

    fn solve(&self, problem: &Problem<'_>) -> Result<Solution> {
        if problem.current.len() == problem.candidates.len() {
            self.bijective.solve(problem)
        } else {
            AlignerSolver.solve(problem)
        }
    }
}
