//! Session configuration
//!
//! Voice limits, octave bounds and bias constants are all plain
//! configuration. Defaults are the most common values.

use crate::error::{Result, VoiceLeadingError};
use crate::solver::Strategy;
use crate::types::pitch::{in_range, octave_of, Pitch, MAX_PITCH, MIN_PITCH};

/// Inclusive range of anchor octaves (register index, `pitch / 12`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OctaveRange {
    pub min: i32,
    pub max: i32,
}

impl OctaveRange {
    pub fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, octave: i32) -> bool {
        (self.min..=self.max).contains(&octave)
    }
}

impl Default for OctaveRange {
    fn default() -> Self {
        Self::new(2, 4)
    }
}

/// How the anchor octave's reference center is obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum AnchorPolicy {
    /// Follow the current chord's center of mass
    #[default]
    Nearest,
    /// Ignore the current chord and anchor around a fixed pitch
    Fixed { center: Pitch },
}

/// Which alignments the bijective solver tries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum BijectiveSearch {
    /// The n cyclic rotations of the sorted target
    #[default]
    Rotations,
    /// All n! orderings of the sorted target
    Permutations,
}

/// Tunables for a [`Session`](crate::session::Session)
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SessionConfig {
    pub max_voices: usize,
    pub octave_range: OctaveRange,
    pub anchor: AnchorPolicy,
    /// Maximum number of candidate pitches the voicing generator emits
    pub candidate_cap: usize,
    /// Subtracted from a candidate's cost when it supplies a required pitch class
    pub completeness_bonus: u32,
    pub strategy: Strategy,
    pub bijective_search: BijectiveSearch,
    /// Largest voice count any permutation enumeration will accept
    pub permutation_ceiling: usize,
    pub feedback: bool,
    pub debug: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_voices: 8,
            octave_range: OctaveRange::default(),
            anchor: AnchorPolicy::default(),
            candidate_cap: 8,
            completeness_bonus: 15,
            strategy: Strategy::default(),
            bijective_search: BijectiveSearch::default(),
            permutation_ceiling: 8,
            feedback: true,
            debug: false,
        }
    }
}

impl SessionConfig {
    pub fn with_max_voices(mut self, max_voices: usize) -> Self {
        self.max_voices = max_voices;
        self
    }

    pub fn with_octave_range(mut self, min: i32, max: i32) -> Self {
        self.octave_range = OctaveRange::new(min, max);
        self
    }

    pub fn with_anchor(mut self, anchor: AnchorPolicy) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn with_candidate_cap(mut self, cap: usize) -> Self {
        self.candidate_cap = cap;
        self
    }

    pub fn with_completeness_bonus(mut self, bonus: u32) -> Self {
        self.completeness_bonus = bonus;
        self
    }

    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_bijective_search(mut self, search: BijectiveSearch) -> Self {
        self.bijective_search = search;
        self
    }

    pub fn with_permutation_ceiling(mut self, ceiling: usize) -> Self {
        self.permutation_ceiling = ceiling;
        self
    }

    pub fn with_feedback(mut self, enabled: bool) -> Self {
        self.feedback = enabled;
        self
    }

    pub fn with_debug(mut self, enabled: bool) -> Self {
        self.debug = enabled;
        self
    }

    /// Reject settings no calculation could run with
    pub fn validate(&self) -> Result<()> {
        if self.max_voices == 0 {
            return Err(VoiceLeadingError::InvalidConfig(
                "max_voices must be at least 1".to_string(),
            ));
        }
        if self.candidate_cap == 0 {
            return Err(VoiceLeadingError::InvalidConfig(
                "candidate_cap must be at least 1".to_string(),
            ));
        }
        if self.permutation_ceiling == 0 {
            return Err(VoiceLeadingError::InvalidConfig(
                "permutation_ceiling must be at least 1".to_string(),
            ));
        }
        if self.octave_range.min > self.octave_range.max {
            return Err(VoiceLeadingError::InvalidConfig(format!(
                "octave range {}..={} is empty",
                self.octave_range.min, self.octave_range.max
            )));
        }
        let (lowest, highest) = (octave_of(MIN_PITCH), octave_of(MAX_PITCH));
        if self.octave_range.min < lowest || self.octave_range.max > highest {
            return Err(VoiceLeadingError::InvalidConfig(format!(
                "octave range {}..={} must lie within {}..={}",
                self.octave_range.min, self.octave_range.max, lowest, highest
            )));
        }
        if let AnchorPolicy::Fixed { center } = self.anchor {
            if !in_range(center) {
                return Err(VoiceLeadingError::InvalidConfig(format!(
                    "anchor center {} must lie within {}..={}",
                    center, MIN_PITCH, MAX_PITCH
                )));
            }
        }
        Ok(())
    }
}
