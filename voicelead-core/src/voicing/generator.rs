//! Candidate voicing generation
//!
//! From an anchor octave and the ordered target pitch classes, emits up to
//! four concrete voicings back to back into one flat candidate list:
//!
//! 1. close position in the anchor octave
//! 2. bass drop: first note an octave lower (anchor above the floor)
//! 3. soprano lift: last note an octave higher (anchor below the ceiling)
//! 4. spread: bass drop and soprano lift together (both bounds allow)
//!
//! Strategies after the first are only added while another full voicing
//! still fits strictly under the candidate cap.

use crate::config::OctaveRange;
use crate::types::calculation::{missing_coverage, CoverageStage, Warning};
use crate::types::pitch::{canonicalize, Pitch, PitchClass, MODULUS};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VoicingStrategy {
    Close,
    BassDrop,
    SopranoLift,
    Spread,
}

impl fmt::Display for VoicingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            VoicingStrategy::Close => "close",
            VoicingStrategy::BassDrop => "bass drop",
            VoicingStrategy::SopranoLift => "soprano lift",
            VoicingStrategy::Spread => "spread",
        };
        write!(f, "{}", name)
    }
}

/// Generated candidates for one calculation
#[derive(Debug, Clone, PartialEq)]
pub struct Voicings {
    pub anchor_octave: i32,
    /// Flat list of candidate pitches, one block of T per strategy
    pub candidates: Vec<Pitch>,
    pub strategies: Vec<VoicingStrategy>,
    /// Required pitch classes found in no candidate
    pub warnings: Vec<Warning>,
}

impl Voicings {
    /// True when every required pitch class has at least one candidate
    pub fn is_complete(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Generate candidate pitches for `target` anchored at `anchor_octave`.
///
/// An empty target yields no candidates. Coverage failures are reported in
/// [`Voicings::warnings`], never as errors.
pub fn generate_voicings(
    anchor_octave: i32,
    target: &[PitchClass],
    range: OctaveRange,
    cap: usize,
) -> Voicings {
    let size = target.len();
    let base = anchor_octave * MODULUS;
    let mut candidates: Vec<Pitch> = Vec::with_capacity(cap.max(size));
    let mut strategies = Vec::new();

    if size > 0 {
        let close: Vec<Pitch> = target.iter().map(|pc| base + pc.as_pitch()).collect();
        let can_drop = anchor_octave > range.min;
        let can_lift = anchor_octave < range.max;

        candidates.extend(&close);
        strategies.push(VoicingStrategy::Close);

        if candidates.len() + size < cap && can_drop {
            candidates.extend(bass_drop(&close));
            strategies.push(VoicingStrategy::BassDrop);
        }

        if candidates.len() + size < cap && can_lift {
            candidates.extend(soprano_lift(&close));
            strategies.push(VoicingStrategy::SopranoLift);
        }

        // A single note cannot be dropped and lifted at once
        if candidates.len() + size < cap && can_drop && can_lift && size > 1 {
            candidates.extend(soprano_lift(&bass_drop(&close)));
            strategies.push(VoicingStrategy::Spread);
        }
    }

    let values: Vec<Pitch> = target.iter().map(|pc| pc.as_pitch()).collect();
    let warnings = missing_coverage(&candidates, &canonicalize(&values), CoverageStage::Candidates);

    Voicings {
        anchor_octave,
        candidates,
        strategies,
        warnings,
    }
}

fn bass_drop(voicing: &[Pitch]) -> Vec<Pitch> {
    let mut dropped = voicing.to_vec();
    if let Some(first) = dropped.first_mut() {
        *first -= MODULUS;
    }
    dropped
}

fn soprano_lift(voicing: &[Pitch]) -> Vec<Pitch> {
    let mut lifted = voicing.to_vec();
    if let Some(last) = lifted.last_mut() {
        *last += MODULUS;
    }
    lifted
}
