// voicelead-core/src/voicing/mod.rs

pub mod anchor;
pub mod generator;

pub use anchor::{center_of_mass, select_anchor, Anchor};
pub use generator::{generate_voicings, VoicingStrategy, Voicings};
