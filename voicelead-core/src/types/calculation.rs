//! The atomic result of one calculation pass, and the non-fatal conditions
//! collected while producing it.

use crate::solver::Strategy;
use crate::types::pitch::{pitch_name, reduce, Pitch, PitchClass};
#[cfg(feature = "colored")]
use colored::*;
use std::fmt;

/// Movement of a single voice from the current chord to the output chord
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VoiceMove {
    pub voice: usize,
    pub from: Pitch,
    pub to: Pitch,
    /// Target slot the voice was matched to; `None` means it kept its pitch
    pub slot: Option<usize>,
}

impl VoiceMove {
    pub fn assigned(voice: usize, from: Pitch, to: Pitch, slot: usize) -> Self {
        VoiceMove {
            voice,
            from,
            to,
            slot: Some(slot),
        }
    }

    /// Fallback for a voice no target slot could take
    pub fn retained(voice: usize, pitch: Pitch) -> Self {
        VoiceMove {
            voice,
            from: pitch,
            to: pitch,
            slot: None,
        }
    }

    pub fn semitones(&self) -> i32 {
        self.to.saturating_sub(self.from)
    }

    pub fn is_assigned(&self) -> bool {
        self.slot.is_some()
    }
}

/// Where a coverage check failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CoverageStage {
    /// The generated candidate voicings
    Candidates,
    /// The final output chord
    Result,
}

/// Non-fatal conditions. Solving proceeds; the caller sees them in
/// [`Calculation::warnings`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Warning {
    UnassignableVoice {
        voice: usize,
        pitch: Pitch,
    },
    IncompleteCoverage {
        pitch_class: PitchClass,
        stage: CoverageStage,
    },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::UnassignableVoice { voice, pitch } => {
                write!(f, "voice {} ({}) could not be assigned, keeping it", voice, pitch)
            }
            Warning::IncompleteCoverage {
                pitch_class,
                stage: CoverageStage::Candidates,
            } => write!(
                f,
                "required pitch class {} missing from candidate voicings",
                pitch_class
            ),
            Warning::IncompleteCoverage {
                pitch_class,
                stage: CoverageStage::Result,
            } => write!(f, "required pitch class {} missing from result", pitch_class),
        }
    }
}

/// Required pitch classes absent from `pitches`, as warnings for `stage`
pub fn missing_coverage(
    pitches: &[Pitch],
    required: &[PitchClass],
    stage: CoverageStage,
) -> Vec<Warning> {
    required
        .iter()
        .filter(|&&pc| !pitches.iter().any(|&p| reduce(p) == pc))
        .map(|&pitch_class| Warning::IncompleteCoverage { pitch_class, stage })
        .collect()
}

/// Everything one `recalculate` emits: the output chord, its cost and the
/// diagnostics describing how it was reached.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Calculation {
    /// One pitch per current voice, in the current chord's voice order
    pub output: Vec<Pitch>,
    pub cost: u32,
    /// Register chosen for the target; pitch-class strategies have none
    pub anchor_octave: Option<i32>,
    pub candidate_count: usize,
    pub voice_count: usize,
    pub warnings: Vec<Warning>,
    pub strategy: Strategy,
    /// Resolved target pitch classes, in target order
    pub target: Vec<PitchClass>,
    pub moves: Vec<VoiceMove>,
    pub current_prime_form: Vec<PitchClass>,
    pub target_prime_form: Vec<PitchClass>,
    /// Orbifold spacing coordinates of the output (4-voice orbifold only)
    pub coordinates: Option<[f32; 3]>,
}

impl Calculation {
    /// First voice of the output, the bass
    pub fn bass(&self) -> Option<Pitch> {
        self.output.first().copied()
    }

    /// Warnings rendered as plain strings
    pub fn warning_messages(&self) -> Vec<String> {
        self.warnings.iter().map(|w| w.to_string()).collect()
    }

    /// True when every voice found a target slot
    pub fn fully_assigned(&self) -> bool {
        self.moves.iter().all(VoiceMove::is_assigned)
    }
}

#[cfg(feature = "colored")]
fn format_move(movement: &VoiceMove) -> String {
    let from = pitch_name(movement.from);
    let to = pitch_name(movement.to);
    let semitones = movement.semitones();

    if !movement.is_assigned() {
        return format!("{}=?", from).red().to_string();
    }
    if semitones == 0 {
        return format!("{}={}", from, to).bright_blue().to_string();
    }

    let text = format!("{}→{}({:+})", from, to, semitones);
    match semitones.abs() {
        1..=2 => text.green().to_string(),
        3..=4 => text.yellow().to_string(),
        _ => text.red().to_string(),
    }
}

#[cfg(not(feature = "colored"))]
fn format_move(movement: &VoiceMove) -> String {
    let from = pitch_name(movement.from);
    if !movement.is_assigned() {
        return format!("{}=?", from);
    }
    if movement.semitones() == 0 {
        return format!("{}={}", from, pitch_name(movement.to));
    }
    format!(
        "{}→{}({:+})",
        from,
        pitch_name(movement.to),
        movement.semitones()
    )
}

impl fmt::Display for Calculation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let output: Vec<String> = self.output.iter().map(|p| p.to_string()).collect();
        write!(f, "[{}] cost {}", output.join(" "), self.cost)?;

        let moves: Vec<String> = self.moves.iter().map(format_move).collect();
        write!(f, " | {}", moves.join(", "))?;

        match self.anchor_octave {
            Some(octave) => write!(
                f,
                " | {} octave {}, {} candidates, {} voices",
                self.strategy, octave, self.candidate_count, self.voice_count
            )?,
            None => write!(
                f,
                " | {}, {} target pcs, {} voices",
                self.strategy, self.candidate_count, self.voice_count
            )?,
        }

        for warning in &self.warnings {
            write!(f, "\n  warning: {}", warning)?;
        }
        Ok(())
    }
}
