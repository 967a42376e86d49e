//! Pitches, pitch classes and the modulo-12 helpers every solver shares.
//!
//! A [`Pitch`] is a signed MIDI-like note number. A [`PitchClass`] is that
//! number reduced modulo 12 and is always stored in `0..12`.

use crate::error::VoiceLeadingError;
use anyhow::{anyhow, Result};
use std::fmt;
use std::ops::Add;

/// Signed MIDI-like note number (60 = middle C)
pub type Pitch = i32;

/// Size of the chromatic octave
pub const MODULUS: i32 = 12;

/// Lowest pitch a session accepts, 100 octaves below C-1
pub const MIN_PITCH: Pitch = -1200;

/// Highest pitch a session accepts
pub const MAX_PITCH: Pitch = 1200;

/// Largest interval class; signed displacements live in `[-5, 6]`
pub const HALF_MODULUS: i32 = 6;

/// A pitch reduced modulo 12
/// 0=C, 1=C#, 2=D, 3=D#, 4=E, 5=F, 6=F#, 7=G, 8=G#, 9=A, 10=A#, 11=B
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "u8", into = "u8")
)]
pub struct PitchClass(u8);

const SHARP_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

impl PitchClass {
    pub const C: PitchClass = PitchClass(0);

    /// Reduce any integer (pitch or interval) to its pitch class
    pub fn from_pitch(pitch: Pitch) -> Self {
        PitchClass(pitch.rem_euclid(MODULUS) as u8)
    }

    /// The chromatic value (0-11)
    pub fn value(self) -> u8 {
        self.0
    }

    /// Value widened for pitch arithmetic
    pub fn as_pitch(self) -> Pitch {
        self.0 as Pitch
    }

    /// Sharp-spelled name, e.g. "F#"
    pub fn name(self) -> &'static str {
        SHARP_NAMES[self.0 as usize]
    }

    /// Transpose by a number of semitones, wrapping around the octave
    pub fn transpose(self, semitones: i32) -> Self {
        Self::from_pitch(self.as_pitch() + semitones.rem_euclid(MODULUS))
    }

    /// Shortest signed motion from `self` to `to`, in `[-5, 6]`.
    ///
    /// The forward distance `(to - self) mod 12` is folded down by an octave
    /// when it exceeds the half modulus, so a tritone is always `+6`.
    pub fn signed_interval_to(self, to: PitchClass) -> i32 {
        let forward = (to.as_pitch() - self.as_pitch()).rem_euclid(MODULUS);
        if forward > HALF_MODULUS {
            forward - MODULUS
        } else {
            forward
        }
    }

    /// Unsigned interval-class distance (0-6): the smaller of the forward
    /// and backward modular distances
    pub fn distance(self, other: PitchClass) -> u8 {
        let forward = (other.as_pitch() - self.as_pitch()).rem_euclid(MODULUS);
        forward.min(MODULUS - forward) as u8
    }
}

impl TryFrom<u8> for PitchClass {
    type Error = VoiceLeadingError;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        if value >= MODULUS as u8 {
            return Err(VoiceLeadingError::InvalidPitchClass { value });
        }
        Ok(PitchClass(value))
    }
}

impl From<PitchClass> for u8 {
    fn from(pc: PitchClass) -> u8 {
        pc.0
    }
}

impl Add<i32> for PitchClass {
    type Output = PitchClass;

    fn add(self, semitones: i32) -> PitchClass {
        self.transpose(semitones)
    }
}

impl fmt::Display for PitchClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// `((pitch % 12) + 12) % 12`
pub fn reduce(pitch: Pitch) -> PitchClass {
    PitchClass::from_pitch(pitch)
}

/// Whether a pitch lies in `MIN_PITCH..=MAX_PITCH`
pub fn in_range(pitch: Pitch) -> bool {
    (MIN_PITCH..=MAX_PITCH).contains(&pitch)
}

/// Register index of a pitch, `floor(pitch / 12)`
pub fn octave_of(pitch: Pitch) -> i32 {
    pitch.div_euclid(MODULUS)
}

/// Reduce and sort, keeping duplicates (a pitch-class multiset)
pub fn sorted_pitch_classes(pitches: &[Pitch]) -> Vec<PitchClass> {
    let mut pcs: Vec<PitchClass> = pitches.iter().map(|&p| reduce(p)).collect();
    pcs.sort();
    pcs
}

/// Reduce, sort ascending and drop duplicates
pub fn canonicalize(pitches: &[Pitch]) -> Vec<PitchClass> {
    let mut pcs = sorted_pitch_classes(pitches);
    pcs.dedup();
    pcs
}

/// Transposition-invariant fingerprint: the canonical set shifted so that
/// it starts at 0. Used for diagnostics only.
pub fn prime_form(pitches: &[Pitch]) -> Vec<PitchClass> {
    let pcs = canonicalize(pitches);
    match pcs.first() {
        Some(&lowest) => pcs
            .iter()
            .map(|pc| pc.transpose(-lowest.as_pitch()))
            .collect(),
        None => Vec::new(),
    }
}

/// Scientific name of a pitch (C4 = 60)
pub fn pitch_name(pitch: Pitch) -> String {
    format!("{}{}", reduce(pitch), octave_of(pitch) - 1)
}

/// Parse a pitch from either a plain integer ("60", "-3") or a note name
/// with optional octave ("C", "F#3", "Bb5"). A missing octave means 4.
pub fn parse_pitch(s: &str) -> Result<Pitch> {
    let s = s.trim();
    if let Ok(number) = s.parse::<Pitch>() {
        return Ok(number);
    }

    let upper = s.to_uppercase();
    let mut note_part_end_idx = 0;
    let mut chars = upper.chars().peekable();

    if let Some(c) = chars.next() {
        note_part_end_idx += c.len_utf8();
    }

    // Second char may be an accidental; 'B' after a letter means flat
    if let Some(&c) = chars.peek() {
        if c == '#' || c == 'B' || c == 'S' {
            note_part_end_idx += 1;
        }
    }

    let note_part = &upper[..note_part_end_idx];
    let octave_part = &upper[note_part_end_idx..];

    let pitch_class: Pitch = match note_part {
        "C" => 0,
        "D" => 2,
        "E" => 4,
        "F" => 5,
        "G" => 7,
        "A" => 9,
        "B" => 11,
        "C#" | "CS" | "DB" => 1,
        "D#" | "DS" | "EB" => 3,
        "F#" | "FS" | "GB" => 6,
        "G#" | "GS" | "AB" => 8,
        "A#" | "AS" | "BB" => 10,
        _ => return Err(anyhow!("Invalid note name: {}", s)),
    };

    let octave = if octave_part.is_empty() {
        4
    } else {
        octave_part
            .parse::<i32>()
            .map_err(|_| anyhow!("Invalid octave: {}", octave_part))?
    };

    octave
        .checked_add(1)
        .and_then(|o| o.checked_mul(MODULUS))
        .and_then(|base| base.checked_add(pitch_class))
        .ok_or_else(|| anyhow!("Octave out of range: {}", octave_part))
}
