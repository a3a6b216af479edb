//! CLI command definitions for the `hookrelay` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod invoke;
pub mod seal;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Verify provider webhooks and relay them as repository dispatch events.
#[derive(Parser)]
#[command(name = "hookrelay", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration file (defaults to the platform config directory).
    #[arg(long, global = true, env = "HOOKRELAY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Also export spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP webhook server.
    Serve {
        /// Port to listen on (overrides `[server] port`).
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to (overrides `[server] host`).
        #[arg(long)]
        host: Option<String>,
    },

    /// Run one serverless-style invocation read as JSON from stdin.
    Invoke {
        /// Read the invocation from a file instead of stdin.
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Encrypt a credential read from stdin into the salted wire format.
    Seal {
        /// Passphrase (prompted for when omitted).
        #[arg(long, env = "HOOKRELAY_PASSPHRASE", hide_env_values = true)]
        passphrase: Option<String>,
    },

    /// Print the `x-hub-signature-256` header value for a request body.
    Sign {
        /// File holding the exact request body.
        body: PathBuf,

        /// Webhook secret (prompted for when omitted).
        #[arg(long, env = "HOOKRELAY_WEBHOOK_SECRET", hide_env_values = true)]
        secret: Option<String>,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}
