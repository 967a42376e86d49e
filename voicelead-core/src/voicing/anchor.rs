//! Octave-anchor selection
//!
//! Places a target pitch-class sequence in the register whose center of
//! mass is closest to a reference center. Means are exact rationals so two
//! octaves at the same distance really tie, and the lower one wins.

use crate::config::{AnchorPolicy, OctaveRange};
use crate::error::{Result, VoiceLeadingError};
use crate::types::pitch::{Pitch, PitchClass, MODULUS};
use num_rational::Ratio;
use num_traits::Signed;
use tracing::trace;

/// The chosen register and how far its center sits from the reference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Anchor {
    pub octave: i32,
    pub displacement: Ratio<i64>,
}

impl Anchor {
    /// Pitch of the anchor octave's C
    pub fn base_pitch(&self) -> Pitch {
        self.octave * MODULUS
    }
}

/// Exact arithmetic mean; `None` for an empty chord
pub fn center_of_mass(pitches: &[Pitch]) -> Option<Ratio<i64>> {
    if pitches.is_empty() {
        return None;
    }
    let sum: i64 = pitches.iter().map(|&p| p as i64).sum();
    Some(Ratio::new(sum, pitches.len() as i64))
}

/// Pick the octave in `range` minimizing `|targetCenter - referenceCenter|`.
///
/// With [`AnchorPolicy::Fixed`] the reference chord is ignored and may be
/// empty. Ties keep the first (lowest) octave.
pub fn select_anchor(
    reference: &[Pitch],
    target: &[PitchClass],
    range: OctaveRange,
    policy: AnchorPolicy,
) -> Result<Anchor> {
    if target.is_empty() {
        return Err(VoiceLeadingError::EmptyInput { what: "target" });
    }

    let reference_center = match policy {
        AnchorPolicy::Nearest => center_of_mass(reference)
            .ok_or(VoiceLeadingError::EmptyInput { what: "reference chord" })?,
        AnchorPolicy::Fixed { center } => Ratio::from_integer(center as i64),
    };

    let mut best: Option<Anchor> = None;

    for octave in range.min..=range.max {
        let base = octave * MODULUS;
        let sum: i64 = target.iter().map(|pc| (base + pc.as_pitch()) as i64).sum();
        let target_center = Ratio::new(sum, target.len() as i64);
        let displacement = (target_center - reference_center).abs();
        trace!(octave, %target_center, %displacement, "anchor candidate");

        if best.map_or(true, |b| displacement < b.displacement) {
            best = Some(Anchor {
                octave,
                displacement,
            });
        }
    }

    best.ok_or_else(|| {
        VoiceLeadingError::InvalidConfig(format!(
            "octave range {}..={} is empty",
            range.min, range.max
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::pitch::reduce;

    fn pcs(values: &[i32]) -> Vec<PitchClass> {
        values.iter().map(|&v| reduce(v)).collect()
    }

    #[test]
    fn test_center_of_mass_single_voice() {
        assert_eq!(center_of_mass(&[61]), Some(Ratio::from_integer(61)));
        assert_eq!(center_of_mass(&[]), None);
    }

    #[test]
    fn test_nearest_octave_for_c_major() {
        // Reference center 53.75; octave 4 places C E G around 51.67
        let anchor = select_anchor(
            &[48, 52, 55, 60],
            &pcs(&[0, 4, 7]),
            OctaveRange::new(2, 4),
            AnchorPolicy::Nearest,
        )
        .unwrap();
        assert_eq!(anchor.octave, 4);
        assert_eq!(anchor.base_pitch(), 48);
        assert_eq!(anchor.displacement, Ratio::new(25, 12));
    }

    #[test]
    fn test_range_clamps_choice() {
        let anchor = select_anchor(
            &[84, 88, 91],
            &pcs(&[0, 4, 7]),
            OctaveRange::new(2, 4),
            AnchorPolicy::Nearest,
        )
        .unwrap();
        assert_eq!(anchor.octave, 4);

        let wider = select_anchor(
            &[84, 88, 91],
            &pcs(&[0, 4, 7]),
            OctaveRange::new(2, 7),
            AnchorPolicy::Nearest,
        )
        .unwrap();
        assert_eq!(wider.octave, 7);
    }

    #[test]
    fn test_tie_keeps_lower_octave() {
        // F# at octave 4 is 54, at octave 5 is 66: both 6 away from 60
        let anchor = select_anchor(
            &[60],
            &pcs(&[6]),
            OctaveRange::new(4, 5),
            AnchorPolicy::Nearest,
        )
        .unwrap();
        assert_eq!(anchor.octave, 4);
        assert_eq!(anchor.displacement, Ratio::from_integer(6));
    }

    #[test]
    fn test_fixed_policy_ignores_reference() {
        let anchor = select_anchor(
            &[],
            &pcs(&[0, 4, 7]),
            OctaveRange::new(2, 7),
            AnchorPolicy::Fixed { center: 60 },
        )
        .unwrap();
        // Octave 5 centers C E G at 63.67, octave 4 at 51.67
        assert_eq!(anchor.octave, 5);
    }

    #[test]
    fn test_empty_inputs_are_rejected() {
        let range = OctaveRange::default();
        assert!(select_anchor(&[60], &[], range, AnchorPolicy::Nearest).is_err());
        assert!(select_anchor(&[], &pcs(&[0]), range, AnchorPolicy::Nearest).is_err());
    }
}
