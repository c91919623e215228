//! PrepWise application binary - composition root.
//!
//! 1. Parse CLI arguments and load configuration from TOML
//! 2. Install the tracing subscriber
//! 3. Load the knowledge base (file or built-in)
//! 4. Run the interactive chat loop on stdin/stdout

mod cli;
mod render;
mod repl;

use std::io;
use std::sync::Arc;

use clap::Parser;
use prepwise_chat::Session;
use prepwise_core::{KnowledgeBase, PrepwiseConfig};
use tracing_subscriber::EnvFilter;

use crate::cli::CliArgs;
use crate::render::RenderOptions;
use crate::repl::Repl;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config comes first so its log level can seed the filter; the outcome
    // is logged once the subscriber exists.
    let config_file = args.resolve_config_path();
    let config_result = PrepwiseConfig::load_if_exists(&config_file);
    let config = match config_result {
        Ok(Some(ref config)) => config.clone(),
        _ => PrepwiseConfig::default(),
    };

    // Tracing. Logs go to stderr so they never interleave with answers.
    let filter = match args.resolve_log_level() {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level)),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    tracing::info!("Starting PrepWise v{}", env!("CARGO_PKG_VERSION"));
    match config_result {
        Ok(Some(_)) => tracing::info!(path = %config_file.display(), "Configuration loaded"),
        Ok(None) if args.config_is_explicit() => tracing::warn!(
            path = %config_file.display(),
            "Config file not found, using defaults"
        ),
        Ok(None) => tracing::debug!(
            path = %config_file.display(),
            "No config file, using defaults"
        ),
        Err(e) => tracing::warn!(
            path = %config_file.display(),
            error = %e,
            "Config not loaded, using defaults"
        ),
    }

    // Knowledge base.
    let knowledge = match args.resolve_knowledge_path(&config) {
        Some(path) => KnowledgeBase::load(&path)?,
        None => {
            tracing::info!("Using built-in knowledge base");
            KnowledgeBase::default()
        }
    };

    let session = Session::new(config.chat.clone(), Arc::new(knowledge));
    tracing::info!(session = %session.id(), "Session started");

    let opts = RenderOptions {
        show_reasoning: args.resolve_show_reasoning(&config),
    };
    let stdin = io::stdin();
    let mut repl = Repl::new(session, stdin.lock(), io::stdout(), opts, args.json);
    repl.run()?;

    tracing::info!(turns = repl.session().history().len(), "Session ended");
    Ok(())
}
