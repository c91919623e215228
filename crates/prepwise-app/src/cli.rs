//! CLI argument definitions for the PrepWise terminal assistant.
//!
//! Priority resolution: CLI args > env vars > config file > defaults.

use clap::Parser;
use std::path::PathBuf;

use prepwise_core::PrepwiseConfig;

/// PrepWise: an emergency-preparedness assistant for the terminal.
#[derive(Parser, Debug)]
#[command(name = "prepwise", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Knowledge base TOML file (built-in data when omitted).
    #[arg(short = 'k', long = "knowledge")]
    pub knowledge: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,

    /// Show reasoning steps and tools used under each answer.
    #[arg(long = "show-reasoning")]
    pub show_reasoning: bool,

    /// Print each assistant turn as a JSON line instead of formatted text.
    #[arg(long = "json")]
    pub json: bool,
}

impl CliArgs {
    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > PREPWISE_CONFIG env var > ~/.prepwise/config.toml.
    pub fn resolve_config_path(&self) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Ok(p) = std::env::var("PREPWISE_CONFIG") {
            return PathBuf::from(p);
        }
        default_config_path()
    }

    /// Whether the config path was chosen by the user (flag or env var)
    /// rather than the platform default.
    pub fn config_is_explicit(&self) -> bool {
        self.config.is_some() || std::env::var_os("PREPWISE_CONFIG").is_some()
    }

    /// Resolve the knowledge base path.
    ///
    /// Priority: --knowledge flag > config file value.
    /// Returns `None` to use the built-in knowledge base.
    pub fn resolve_knowledge_path(&self, config: &PrepwiseConfig) -> Option<PathBuf> {
        self.knowledge
            .clone()
            .or_else(|| config.knowledge.path.as_ref().map(PathBuf::from))
    }

    /// Resolve the log level.
    ///
    /// Priority: --log-level flag > config file value. `RUST_LOG` sits between
    /// the two and is handled where the subscriber is built.
    pub fn resolve_log_level(&self) -> Option<String> {
        self.log_level.clone()
    }

    pub fn resolve_show_reasoning(&self, config: &PrepwiseConfig) -> bool {
        self.show_reasoning || config.chat.show_reasoning
    }
}

/// Default config file path for the current platform.
fn default_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    if let Ok(home) = std::env::var("USERPROFILE") {
        return PathBuf::from(home).join(".prepwise").join("config.toml");
    }
    #[cfg(not(target_os = "windows"))]
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".prepwise").join("config.toml");
    }
    PathBuf::from("config.toml")
}
