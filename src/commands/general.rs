//! General REPL commands (help, quit, config)

use crate::commands::{CommandContext, CommandResult};
use anyhow::{Context, Result};
use colored::*;
use std::fs;
use tracing::info;
use voicelead_core::SessionConfig;

/// Handle `help` command
pub fn cmd_help(_args: &str, _ctx: &mut CommandContext) -> CommandResult {
    print_help();
    CommandResult::Success
}

/// Handle `quit` or `exit` command
pub fn cmd_quit(_args: &str, _ctx: &mut CommandContext) -> CommandResult {
    CommandResult::Exit
}

/// Read a session configuration from a TOML file
pub fn load_config(path: &str) -> Result<SessionConfig> {
    let text = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path))?;
    let config: SessionConfig =
        toml::from_str(&text).with_context(|| format!("Invalid configuration in {}", path))?;
    config.validate()?;
    Ok(config)
}

/// Handle `config [file]`: show the configuration, or load one from TOML
pub fn cmd_config(args: &str, ctx: &mut CommandContext) -> CommandResult {
    if args.is_empty() {
        return match toml::to_string_pretty(ctx.session.config()) {
            Ok(text) => CommandResult::Message(text.trim_end().to_string()),
            Err(e) => CommandResult::Error(format!("Failed to render configuration: {}", e)),
        };
    }

    let config = match load_config(args) {
        Ok(config) => config,
        Err(e) => return CommandResult::Error(format!("{:#}", e)),
    };
    match ctx.session.set_config(config) {
        Ok(()) => {
            info!(path = args, "configuration loaded");
            CommandResult::Message(
                format!("Configuration loaded from {}", args)
                    .bright_green()
                    .to_string(),
            )
        }
        Err(e) => CommandResult::Error(e.to_string()),
    }
}

/// Print help information
fn print_help() {
    println!("{}", "Voice Leading Help".bold());
    println!("{}", "==================".bold());
    println!();
    println!("{}", "Messages:".green());
    println!(
        "  {}    - Set the current chord (numbers or note names)",
        "current 48 52 55 60".cyan()
    );
    println!("  {}   - Same, with note names", "current C3 E3 G3 C4".cyan());
    println!(
        "  {}            - Target as explicit pitch classes",
        "target 0 4 7".cyan()
    );
    println!(
        "  {}        - Target as root : intervals",
        "target D : 0 4 7".cyan()
    );
    println!("  {}                  - Store a root", "root 2".cyan());
    println!(
        "  {}             - Chord structure over the stored root",
        "chord 0 4 7".cyan()
    );
    println!(
        "  {}            - Replace the current chord with each result",
        "feedback on|off".cyan()
    );
    println!("  {}               - Trace calculations", "debug on|off".cyan());
    println!(
        "  {}       - Run the calculation again",
        "recalculate | bang".cyan()
    );
    println!();
    println!("{}", "Settings:".green());
    println!(
        "  {}   - greedy, exhaustive, bijective, aligner, adaptive, orbifold",
        "strategy <name>".cyan()
    );
    println!(
        "  {}  - Bijective alignments to try",
        "search rotations|permutations".cyan()
    );
    println!(
        "  {}        - Anchor near the current chord or a fixed pitch",
        "anchor nearest|<pitch>".cyan()
    );
    println!("  {}               - Output as text or JSON", "format text|json".cyan());
    println!(
        "  {}               - Show or load (TOML) the configuration",
        "config [file]".cyan()
    );
    println!();
    println!("{}", "Diagnostics:".green());
    println!("  {}                    - Voice distance matrix", "matrix".cyan());
    println!("  {}                      - Session state", "show".cyan());
    println!();
    println!("{}", "Examples:".green());
    println!("  voicelead> {}", "current 48 52 55 60".cyan());
    println!("  voicelead> {}", "target 0 4 7".cyan());
    println!("  [48 52 55 55] cost 5 | C3=C3, E3=E3, G3=G3, C4→G3(-5) | greedy octave 4, 6 candidates, 4 voices");
    println!();
    println!("{}", "Other Commands:".green());
    println!("  {}              - Show this help", "help".bright_green());
    println!("  {}              - Exit the REPL", "quit".bright_red());
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use voicelead_core::{AnchorPolicy, Session, Strategy};

    fn write_config(name: &str, contents: &str) -> String {
        let path = std::env::temp_dir().join(name);
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn test_load_partial_config() {
        let path = write_config(
            "voicelead_partial.toml",
            "max_voices = 4\nstrategy = \"bijective\"\n\n[octave_range]\nmin = 2\nmax = 7\n",
        );
        let config = load_config(&path).unwrap();
        assert_eq!(config.max_voices, 4);
        assert_eq!(config.strategy, Strategy::Bijective);
        assert_eq!(config.octave_range.max, 7);
        assert_eq!(config.candidate_cap, 8);
        assert_eq!(config.anchor, AnchorPolicy::Nearest);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let path = write_config(
            "voicelead_invalid.toml",
            "[octave_range]\nmin = 5\nmax = 3\n",
        );
        assert!(load_config(&path).is_err());
    }

    #[test]
    fn test_config_command() {
        let mut ctx = CommandContext::new(Session::default());
        assert!(matches!(
            cmd_config("", &mut ctx),
            CommandResult::Message(_)
        ));
        assert!(matches!(
            cmd_config("/nonexistent/voicelead.toml", &mut ctx),
            CommandResult::Error(_)
        ));
    }
}
