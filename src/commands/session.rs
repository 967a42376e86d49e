//! Session commands: the host messages and the settings around them

use crate::commands::{CommandContext, CommandResult, OutputFormat};
use anyhow::{anyhow, Result};
use colored::*;
use voicelead_core::types::{parse_pitch, pitch_name, Pitch};
use voicelead_core::{AnchorPolicy, BijectiveSearch, Strategy};

/// Split a list like `48 52 55`, `[C3, E3, G3]` or `0,4,7` into tokens
fn tokens(args: &str) -> impl Iterator<Item = &str> {
    args.split(|c: char| c.is_whitespace() || c == ',' || c == '[' || c == ']')
        .filter(|t| !t.is_empty())
}

/// Parse pitches given as numbers or note names
pub fn parse_pitches(args: &str) -> Result<Vec<Pitch>> {
    tokens(args).map(parse_pitch).collect()
}

/// Parse plain integers (pitch classes or intervals)
pub fn parse_integers(args: &str) -> Result<Vec<i32>> {
    tokens(args)
        .map(|t| {
            t.parse::<i32>()
                .map_err(|_| anyhow!("Expected an integer, got '{}'", t))
        })
        .collect()
}

fn parse_flag(args: &str) -> Option<bool> {
    match args.to_lowercase().as_str() {
        "1" | "on" | "true" | "yes" => Some(true),
        "0" | "off" | "false" | "no" => Some(false),
        _ => None,
    }
}

fn on_off(enabled: bool) -> ColoredString {
    if enabled {
        "on".bright_green()
    } else {
        "off".bright_red()
    }
}

fn format_chord(pitches: &[Pitch]) -> String {
    let names: Vec<String> = pitches
        .iter()
        .map(|&p| format!("{}({})", pitch_name(p), p))
        .collect();
    format!("[{}]", names.join(", "))
}

/// Handle `current <pitches>`
pub fn cmd_current(args: &str, ctx: &mut CommandContext) -> CommandResult {
    if args.is_empty() {
        return CommandResult::Message(format!(
            "Current chord: {}",
            format_chord(ctx.session.current())
        ));
    }
    let pitches = match parse_pitches(args) {
        Ok(pitches) => pitches,
        Err(e) => return CommandResult::Error(e.to_string()),
    };
    match ctx.session.set_current_chord(&pitches) {
        Ok(()) => CommandResult::Message(format!("Current chord: {}", format_chord(&pitches))),
        Err(e) => CommandResult::Error(e.to_string()),
    }
}

/// Handle `root <pitch>`
pub fn cmd_root(args: &str, ctx: &mut CommandContext) -> CommandResult {
    if args.is_empty() {
        return CommandResult::Message(format!("Root: {}", ctx.session.root()));
    }
    let root = match parse_pitch(args) {
        Ok(root) => root,
        Err(e) => return CommandResult::Error(e.to_string()),
    };
    let outcome = ctx.session.set_root(root);
    let stored = format!("Root stored: {}", ctx.session.root());
    ctx.report(outcome, &stored)
}

/// Handle `chord <intervals>`: a chord structure over the stored root
pub fn cmd_chord(args: &str, ctx: &mut CommandContext) -> CommandResult {
    let intervals = match parse_integers(args) {
        Ok(intervals) => intervals,
        Err(e) => return CommandResult::Error(e.to_string()),
    };
    let outcome = ctx.session.set_chord_structure(&intervals);
    ctx.report(outcome, "Chord structure stored")
}

/// Handle `target <pitch classes>` or `target <root> : <intervals>`
pub fn cmd_target(args: &str, ctx: &mut CommandContext) -> CommandResult {
    let outcome = match args.split_once(':') {
        Some((root, intervals)) => {
            let root = match parse_pitch(root) {
                Ok(root) => root,
                Err(e) => return CommandResult::Error(e.to_string()),
            };
            match parse_integers(intervals) {
                Ok(intervals) => ctx.session.set_target_relative(root, &intervals),
                Err(e) => return CommandResult::Error(e.to_string()),
            }
        }
        None => match parse_integers(args) {
            Ok(pitch_classes) => ctx.session.set_target_absolute(&pitch_classes),
            Err(e) => return CommandResult::Error(e.to_string()),
        },
    };
    ctx.report(outcome, "Target stored")
}

/// Handle `feedback [on|off]`
pub fn cmd_feedback(args: &str, ctx: &mut CommandContext) -> CommandResult {
    if !args.is_empty() {
        match parse_flag(args) {
            Some(enabled) => ctx.session.set_feedback(enabled),
            None => return CommandResult::Error("Usage: feedback [on|off]".to_string()),
        }
    }
    CommandResult::Message(format!("Feedback {}", on_off(ctx.session.config().feedback)))
}

/// Handle `debug [on|off]`
pub fn cmd_debug(args: &str, ctx: &mut CommandContext) -> CommandResult {
    if !args.is_empty() {
        match parse_flag(args) {
            Some(enabled) => ctx.session.set_debug(enabled),
            None => return CommandResult::Error("Usage: debug [on|off]".to_string()),
        }
    }
    CommandResult::Message(format!("Debug {}", on_off(ctx.session.config().debug)))
}

/// Handle `recalculate` / `bang`
pub fn cmd_recalculate(_args: &str, ctx: &mut CommandContext) -> CommandResult {
    match ctx.session.recalculate() {
        Ok(calculation) => ctx.render(&calculation),
        Err(e) => CommandResult::Error(e.to_string()),
    }
}

/// Handle `strategy [name]`
pub fn cmd_strategy(args: &str, ctx: &mut CommandContext) -> CommandResult {
    if args.is_empty() {
        return CommandResult::Message(format!(
            "Strategy: {}",
            ctx.session.config().strategy.to_string().cyan()
        ));
    }
    match Strategy::from_name(args) {
        Some(strategy) => {
            ctx.session.set_strategy(strategy);
            CommandResult::Message(format!("Strategy set to {}", strategy.to_string().cyan()))
        }
        None => CommandResult::Error(format!(
            "Unknown strategy '{}'. Use greedy, exhaustive, bijective, aligner, adaptive or orbifold",
            args
        )),
    }
}

/// Handle `search rotations|permutations`
pub fn cmd_search(args: &str, ctx: &mut CommandContext) -> CommandResult {
    let search = match args.to_lowercase().as_str() {
        "rotations" | "rotation" => BijectiveSearch::Rotations,
        "permutations" | "permutation" | "all" => BijectiveSearch::Permutations,
        "" => {
            return CommandResult::Message(format!(
                "Bijective search: {:?}",
                ctx.session.config().bijective_search
            ))
        }
        _ => return CommandResult::Error("Usage: search rotations|permutations".to_string()),
    };
    let config = ctx.session.config().clone().with_bijective_search(search);
    match ctx.session.set_config(config) {
        Ok(()) => CommandResult::Message(format!("Bijective search: {:?}", search)),
        Err(e) => CommandResult::Error(e.to_string()),
    }
}

/// Handle `anchor nearest` / `anchor <pitch>`
pub fn cmd_anchor(args: &str, ctx: &mut CommandContext) -> CommandResult {
    let policy = match args {
        "" => {
            return CommandResult::Message(format!(
                "Anchor: {:?}, octaves {}..={}",
                ctx.session.config().anchor,
                ctx.session.config().octave_range.min,
                ctx.session.config().octave_range.max
            ))
        }
        "nearest" => AnchorPolicy::Nearest,
        other => match parse_pitch(other) {
            Ok(center) => AnchorPolicy::Fixed { center },
            Err(e) => return CommandResult::Error(e.to_string()),
        },
    };
    let config = ctx.session.config().clone().with_anchor(policy);
    match ctx.session.set_config(config) {
        Ok(()) => CommandResult::Message(format!("Anchor: {:?}", policy)),
        Err(e) => CommandResult::Error(e.to_string()),
    }
}

/// Handle `matrix`: distances between the current chord and the target
pub fn cmd_matrix(_args: &str, ctx: &mut CommandContext) -> CommandResult {
    match ctx.session.distance_matrix() {
        Ok(matrix) => CommandResult::Message(format!(
            "{} ({}x{})\n{}",
            "Distance matrix".bold(),
            matrix.rows(),
            matrix.cols(),
            matrix.to_string().trim_end()
        )),
        Err(e) => CommandResult::Error(e.to_string()),
    }
}

/// Handle `show`: session state and the last calculation
pub fn cmd_show(_args: &str, ctx: &mut CommandContext) -> CommandResult {
    let session = &ctx.session;
    let target = session
        .target()
        .map(|t| t.to_string())
        .unwrap_or_else(|| "none".to_string());

    let mut text = format!(
        "{}\n  current:  {}\n  root:     {}\n  target:   {}\n  strategy: {}\n  feedback: {}  debug: {}",
        "Session".bold(),
        format_chord(session.current()),
        session.root(),
        target,
        session.config().strategy,
        on_off(session.config().feedback),
        on_off(session.config().debug),
    );
    if let Some(calculation) = session.last_calculation() {
        text.push_str(&format!("\n  last:     {}", calculation));
    }
    CommandResult::Message(text)
}

/// Handle `format text|json`
pub fn cmd_format(args: &str, ctx: &mut CommandContext) -> CommandResult {
    match args.to_lowercase().as_str() {
        "text" => ctx.format = OutputFormat::Text,
        "json" => ctx.format = OutputFormat::Json,
        "" => {}
        _ => return CommandResult::Error("Usage: format text|json".to_string()),
    }
    CommandResult::Message(format!("Output format: {:?}", ctx.format))
}
