//! # Voicelead
//!
//! Interactive driver for the voice leading engine in `voicelead-core`.
//! It stands in for a host runtime: each line typed at the prompt is one
//! message ("current", "root", "chord", "target", "feedback", "debug",
//! "recalculate") delivered to a [`voicelead_core::Session`], and every
//! calculation the session emits is printed as colored text or JSON.
//!
//! ## Modules
//!
//! - `commands`: the command registry and the handlers for each message.
//! - `repl`: the Read-Eval-Print Loop.

pub mod commands;
pub mod repl;
