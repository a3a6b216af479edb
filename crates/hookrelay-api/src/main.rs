//! hookrelay CLI, HTTP server and serverless entry point.
//!
//! Binary name: `hookrelay`
//!
//! Parses CLI arguments, loads configuration, wires the gateway, then runs
//! the HTTP server, a single invocation, or one of the credential helpers.

mod cli;
mod http;
mod state;

use std::path::PathBuf;

use clap::Parser;
use clap_complete::generate;
use console::style;

use hookrelay_infra::config::{default_config_path, load_config};
use hookrelay_observe::tracing_setup::{init_tracing, shutdown_tracing};
use hookrelay_types::config::GatewayConfig;

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up tracing based on verbosity
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info,hookrelay=debug,hookrelay_core=debug,hookrelay_infra=debug",
        _ => "trace",
    };
    init_tracing(filter, cli.otel).map_err(|e| anyhow::anyhow!("can't initialize tracing: {e}"))?;

    let result = run(cli).await;
    shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            generate(shell, &mut cmd, "hookrelay", &mut std::io::stdout());
        }

        Commands::Seal { passphrase } => {
            cli::seal::seal_secret(passphrase)?;
        }

        Commands::Sign { body, secret } => {
            cli::seal::sign_body(&body, secret).await?;
        }

        Commands::Invoke { input } => {
            let config = resolve_config(cli.config).await?;
            let state = AppState::init(&config)?;
            cli::invoke::invoke(&state, input.as_deref()).await?;
        }

        Commands::Serve { port, host } => {
            let config = resolve_config(cli.config).await?;
            let state = AppState::init(&config)?;

            let host = host.unwrap_or(config.server.host);
            let port = port.unwrap_or(config.server.port);
            let addr = format!("{host}:{port}");
            let listener = tokio::net::TcpListener::bind(&addr).await?;

            println!(
                "  {} hookrelay listening on {}",
                style("⚡").bold(),
                style(format!("http://{addr}/webhook")).cyan()
            );
            println!("  {}", style("Press Ctrl+C to stop").dim());

            let router = http::router::build_router(state);

            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            println!("\n  Server stopped.");
        }
    }

    Ok(())
}

/// Load the configuration from `--config`, or the default location.
async fn resolve_config(path: Option<PathBuf>) -> anyhow::Result<GatewayConfig> {
    match path.or_else(default_config_path) {
        Some(path) => Ok(load_config(&path).await?),
        None => {
            tracing::debug!("No config directory on this platform, using defaults");
            Ok(GatewayConfig::default())
        }
    }
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
