//! Target harmonic structures

use crate::types::pitch::{canonicalize, PitchClass};
use std::fmt;

/// What the current chord should move to.
///
/// Both forms resolve to the same ordered pitch-class sequence before any
/// solver sees them.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TargetSpec {
    /// Explicit pitch classes, in order
    Absolute(Vec<PitchClass>),
    /// A root plus intervals above it (a chord structure)
    Relative {
        root: PitchClass,
        intervals: Vec<i32>,
    },
}

impl TargetSpec {
    /// Build an absolute target from raw integers, reducing each one
    pub fn absolute(values: &[i32]) -> Self {
        TargetSpec::Absolute(values.iter().map(|&v| PitchClass::from_pitch(v)).collect())
    }

    /// Build a root + intervals target
    pub fn relative(root: i32, intervals: &[i32]) -> Self {
        TargetSpec::Relative {
            root: PitchClass::from_pitch(root),
            intervals: intervals.to_vec(),
        }
    }

    /// Number of target slots
    pub fn len(&self) -> usize {
        match self {
            TargetSpec::Absolute(pcs) => pcs.len(),
            TargetSpec::Relative { intervals, .. } => intervals.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Ordered pitch classes: `(root + interval[i]) mod 12` for relative targets
    pub fn pitch_classes(&self) -> Vec<PitchClass> {
        match self {
            TargetSpec::Absolute(pcs) => pcs.clone(),
            TargetSpec::Relative { root, intervals } => {
                intervals.iter().map(|&i| root.transpose(i)).collect()
            }
        }
    }

    /// Distinct pitch classes the result must contain, sorted
    pub fn required(&self) -> Vec<PitchClass> {
        let values: Vec<i32> = self.pitch_classes().iter().map(|pc| pc.as_pitch()).collect();
        canonicalize(&values)
    }

    /// Same structure, new root. Absolute targets are returned unchanged.
    pub fn with_root(&self, root: PitchClass) -> Self {
        match self {
            TargetSpec::Absolute(_) => self.clone(),
            TargetSpec::Relative { intervals, .. } => TargetSpec::Relative {
                root,
                intervals: intervals.clone(),
            },
        }
    }
}

impl fmt::Display for TargetSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self.pitch_classes().iter().map(|pc| pc.to_string()).collect();
        match self {
            TargetSpec::Absolute(_) => write!(f, "[{}]", names.join(", ")),
            TargetSpec::Relative { root, intervals } => {
                let steps: Vec<String> = intervals.iter().map(|i| i.to_string()).collect();
                write!(f, "{} + ({}) = [{}]", root, steps.join(" "), names.join(", "))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_resolves_with_root() {
        let d_major = TargetSpec::relative(2, &[0, 4, 7]);
        let values: Vec<u8> = d_major.pitch_classes().iter().map(|pc| pc.value()).collect();
        assert_eq!(values, vec![2, 6, 9]);
    }

    #[test]
    fn test_both_forms_agree() {
        let relative = TargetSpec::relative(9, &[0, 3, 7]);
        let absolute = TargetSpec::absolute(&[9, 0, 4]);
        assert_eq!(relative.pitch_classes(), absolute.pitch_classes());
    }

    #[test]
    fn test_absolute_reduces_out_of_range_values() {
        let target = TargetSpec::absolute(&[12, -1, 16]);
        let values: Vec<u8> = target.pitch_classes().iter().map(|pc| pc.value()).collect();
        assert_eq!(values, vec![0, 11, 4]);
    }

    #[test]
    fn test_required_dedups() {
        let target = TargetSpec::relative(0, &[0, 4, 7, 12]);
        assert_eq!(target.len(), 4);
        assert_eq!(target.required().len(), 3);
    }

    #[test]
    fn test_with_root_keeps_structure() {
        let target = TargetSpec::relative(0, &[0, 4, 7]).with_root(PitchClass::from_pitch(5));
        let values: Vec<u8> = target.pitch_classes().iter().map(|pc| pc.value()).collect();
        assert_eq!(values, vec![5, 9, 0]);
    }
}
