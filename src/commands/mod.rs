//! Command registry for REPL commands
//!
//! Each command is one host message delivered to the session. Handlers are
//! plain functions looked up by prefix.

pub mod general;
pub mod session;

use voicelead_core::{Calculation, Result as LeadResult, Session};

/// Result of executing a command
#[derive(Debug)]
pub enum CommandResult {
    /// Command executed successfully, continue REPL
    Success,
    /// Command executed, show this message
    Message(String),
    /// Exit the REPL
    Exit,
    /// No registered command matches the input
    NotACommand,
    /// Error occurred
    Error(String),
}

/// How calculations are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Colored, human-readable summary
    #[default]
    Text,
    /// One JSON object per calculation, for routing to other tools
    Json,
}

/// Context passed to command handlers
pub struct CommandContext {
    pub session: Session,
    pub format: OutputFormat,
}

impl CommandContext {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            format: OutputFormat::default(),
        }
    }

    /// Render a calculation in the selected format
    pub fn render(&self, calculation: &Calculation) -> CommandResult {
        match self.format {
            OutputFormat::Json => match serde_json::to_string(calculation) {
                Ok(json) => CommandResult::Message(json),
                Err(e) => CommandResult::Error(format!("Failed to serialize result: {}", e)),
            },
            OutputFormat::Text => CommandResult::Message(calculation.to_string()),
        }
    }

    /// Turn the outcome of a session update into a command result
    pub fn report(&self, outcome: LeadResult<Option<Calculation>>, stored: &str) -> CommandResult {
        match outcome {
            Ok(Some(calculation)) => self.render(&calculation),
            Ok(None) => CommandResult::Message(stored.to_string()),
            Err(e) => CommandResult::Error(e.to_string()),
        }
    }
}

/// A command handler function
pub type CommandHandler = fn(&str, &mut CommandContext) -> CommandResult;

/// Registry of available commands
pub struct CommandRegistry {
    /// Commands indexed by their prefix, sorted by prefix length descending
    /// for longest-match-first lookup
    commands: Vec<(String, CommandHandler)>,
}

impl CommandRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
        }
    }

    /// Register a command with its prefix
    pub fn register(&mut self, prefix: &str, handler: CommandHandler) {
        self.commands.push((prefix.to_string(), handler));
        self.commands.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
    }

    /// Execute a command, returning NotACommand if no match found
    pub fn execute(&self, input: &str, ctx: &mut CommandContext) -> CommandResult {
        for (prefix, handler) in &self.commands {
            if input == prefix.as_str() || input.starts_with(&format!("{} ", prefix)) {
                let args = if input.len() > prefix.len() {
                    input[prefix.len()..].trim()
                } else {
                    ""
                };
                return handler(args, ctx);
            }
        }
        CommandResult::NotACommand
    }

    /// Get all registered command prefixes
    pub fn list_commands(&self) -> Vec<&str> {
        self.commands.iter().map(|(p, _)| p.as_str()).collect()
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Create a fully populated command registry with all built-in commands
pub fn create_registry() -> CommandRegistry {
    let mut registry = CommandRegistry::new();

    // Session messages
    registry.register("current", session::cmd_current);
    registry.register("root", session::cmd_root);
    registry.register("chord", session::cmd_chord);
    registry.register("target", session::cmd_target);
    registry.register("feedback", session::cmd_feedback);
    registry.register("debug", session::cmd_debug);
    registry.register("recalculate", session::cmd_recalculate);
    registry.register("bang", session::cmd_recalculate);

    // Session settings and diagnostics
    registry.register("strategy", session::cmd_strategy);
    registry.register("search", session::cmd_search);
    registry.register("anchor", session::cmd_anchor);
    registry.register("matrix", session::cmd_matrix);
    registry.register("show", session::cmd_show);
    registry.register("format", session::cmd_format);

    // General commands
    registry.register("config", general::cmd_config);
    registry.register("help", general::cmd_help);
    registry.register("quit", general::cmd_quit);
    registry.register("exit", general::cmd_quit);

    registry
}
