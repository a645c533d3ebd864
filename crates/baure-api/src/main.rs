//! Baure cultural archive CLI and REST API entry point.
//!
//! Binary name: `baure`
//!
//! Parses CLI arguments, loads settings, wires the services, then
//! dispatches to the command handler or starts the REST API server.

mod cli;
mod http;
mod state;

use anyhow::Context as _;
use clap::Parser;

use baure_infra::config::load_settings;
use baure_observe::tracing_setup::{LogOptions, init_tracing, shutdown_tracing};
use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_options = LogOptions {
        json: cli.log_json,
        enable_otel: cli.otel,
        ..LogOptions::from_verbosity(cli.verbose, cli.quiet)
    };
    init_tracing(&log_options).map_err(|e| anyhow::anyhow!("failed to initialize logging: {e}"))?;

    let result = run(cli).await;
    shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut settings = load_settings().await;

    match cli.command {
        Commands::Serve { port, host } => {
            if let Some(port) = port {
                settings.config.server.port = port;
            }
            if let Some(host) = host {
                settings.config.server.host = host;
            }
            let addr = format!(
                "{}:{}",
                settings.config.server.host, settings.config.server.port
            );

            let state = AppState::init(settings).await?;
            let listener = tokio::net::TcpListener::bind(&addr)
                .await
                .with_context(|| format!("failed to bind {addr}"))?;

            println!(
                "  {} Baure archive listening on {}",
                console::style("⚡").bold(),
                console::style(format!("http://{addr}")).cyan()
            );
            println!(
                "  {} {}",
                console::style("Data:").dim(),
                state.data_dir.display()
            );
            println!("  {}", console::style("Press Ctrl+C to stop").dim());

            let router = http::router::build_router(state);

            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            println!("\n  Server stopped.");
        }

        Commands::Ask {
            question,
            recipe,
            recipe_id,
            dry_run,
        } => {
            let state = AppState::init(settings).await?;
            cli::ask::ask(
                &state,
                &question,
                recipe.as_deref(),
                recipe_id.as_deref(),
                dry_run,
                cli.json,
            )
            .await?;
        }

        Commands::Seed { file } => {
            let state = AppState::init(settings).await?;
            cli::seed::seed(&state, &file, cli.json).await?;
        }
    }

    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl+C: {e}");
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
    tracing::info!("shutdown signal received");
}
