//! Error types for voice leading sessions and solvers

use thiserror::Error;

/// Rejections raised by the session, the anchor selector and the solvers.
///
/// All of them are recoverable: a rejected update leaves the session as it
/// was, and a rejected calculation emits nothing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VoiceLeadingError {
    #[error("too many {what} ({len}), max is {max}")]
    InputTooLarge {
        what: &'static str,
        len: usize,
        max: usize,
    },

    #[error("pitch {pitch} is outside {min}..={max}")]
    PitchOutOfRange { pitch: i32, min: i32, max: i32 },

    #[error("empty {what} received")]
    EmptyInput { what: &'static str },

    #[error("missing chord data (current: {current}, target: {target})")]
    MissingData { current: usize, target: usize },

    #[error("voice count mismatch (current: {current}, target: {target})")]
    SizeMismatch { current: usize, target: usize },

    #[error("{voices} voices exceed the permutation ceiling of {ceiling}")]
    PermutationLimit { voices: usize, ceiling: usize },

    #[error("pitch class must be 0-11, got {value}")]
    InvalidPitchClass { value: u8 },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, VoiceLeadingError>;
