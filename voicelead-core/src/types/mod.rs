// voicelead-core/src/types/mod.rs

pub mod calculation;
pub mod pitch;
pub mod target;

pub use calculation::{missing_coverage, Calculation, CoverageStage, VoiceMove, Warning};
pub use pitch::{
    canonicalize, in_range, octave_of, parse_pitch, pitch_name, prime_form, reduce,
    sorted_pitch_classes, Pitch, PitchClass, MAX_PITCH, MIN_PITCH,
};
pub use target::TargetSpec;
