//! CLI command definitions for the `chatrelay` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod chat;
pub mod session;
pub mod status;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Multi-session chat relay in front of an OpenAI-compatible model.
#[derive(Parser)]
#[command(name = "chatrelay", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to config.toml (default: $CHATRELAY_DATA_DIR/config.toml).
    #[arg(long, global = true, env = "CHATRELAY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Export tracing spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP API server.
    Serve {
        /// Port to listen on (default: server.port from config).
        #[arg(long, short)]
        port: Option<u16>,

        /// Host to bind to (default: server.host from config).
        #[arg(long)]
        host: Option<String>,
    },

    /// Manage chat sessions.
    Session {
        #[command(subcommand)]
        action: SessionCommand,
    },

    /// Send one message to a session and print the reply.
    Chat {
        /// Session id (created on first use).
        session_id: String,

        /// Message text.
        message: String,
    },

    /// Show database, provider and usage counts.
    Status,

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum SessionCommand {
    /// Create a session (no-op if it already exists).
    Create {
        /// Session id.
        session_id: String,
    },

    /// Show a session and its stored messages.
    Show {
        /// Session id.
        session_id: String,
    },
}

impl Commands {
    /// Whether the command calls the completion provider.
    pub fn needs_provider(&self) -> bool {
        matches!(self, Commands::Serve { .. } | Commands::Chat { .. })
    }
}
