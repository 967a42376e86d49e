//! # Voicelead Core
//!
//! Host-agnostic library for minimal-cost voice leading: moving the voices
//! of a current chord onto a target harmonic structure with as little total
//! movement as possible.
//!
//! ## Features
//!
//! - **serde**: Serialize configuration and results (JSON output, TOML config)
//! - **colored**: Colored `Display` for calculations (on by default)
//!
//! ## Example
//!
//! ```ignore
//! use voicelead_core::{Session, SessionConfig, Strategy};
//!
//! let mut session = Session::new(SessionConfig::default().with_strategy(Strategy::Aligner))?;
//! session.set_current_chord(&[48, 52, 55, 60])?;
//! let calculation = session.set_target_absolute(&[0, 4, 7])?;
//! println!("{}", calculation.unwrap());
//! ```

pub mod config;
pub mod error;
pub mod session;
pub mod solver;
pub mod types;
pub mod voicing;

// Re-export commonly used types
pub use config::{AnchorPolicy, BijectiveSearch, OctaveRange, SessionConfig};
pub use error::{Result, VoiceLeadingError};
pub use session::Session;
pub use solver::{DistanceMatrix, Strategy};
pub use types::{Calculation, Pitch, PitchClass, TargetSpec, VoiceMove, Warning};
