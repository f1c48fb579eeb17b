//! herakles-thread-inspector - version 0.1.0
//!
//! Worker thread snapshot inspector with tracing logging.
//! This is the main entry point that initializes the server and handles subcommands.

mod cli;
mod commands;
mod config;
mod handlers;
mod health_stats;
mod state;

use axum::{routing::get, Router};
use clap::Parser;
use herakles_thread_inspector::snapshot::DEFAULT_FETCH_TIMEOUT_SECS;
use herakles_thread_inspector::SnapshotFetcher;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::{net::TcpListener, signal};
use tracing::{error, info};

use cli::{Args, Commands};
use commands::{
    command_config, command_generate_testdata, command_groups, command_show, SnapshotShape,
};
use config::{
    require_server_source, resolve_config, show_config, tracing_level, validate_effective_config,
    Config, DEFAULT_BIND_ADDR, DEFAULT_PORT,
};
use handlers::{groups_handler, health_handler, root_handler, threads_handler};
use health_stats::HealthStats;
use state::AppState;

/// Initializes tracing logging subsystem with the resolved log level.
fn setup_logging(config: &Config) {
    let Some(log_level) = tracing_level(config) else {
        return;
    };

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return;
    }

    info!("Logging initialized with level: {}", log_level);
}

/// Helper function to load and validate configuration.
/// Exits the process with error code 1 if validation fails.
fn load_validated_config(args: &Args) -> Result<Config, Box<dyn std::error::Error>> {
    let config = resolve_config(args)?;
    if let Err(e) = validate_effective_config(&config) {
        eprintln!("❌ Configuration invalid: {}", e);
        std::process::exit(1);
    }
    Ok(config)
}

/// Resolves once Ctrl+C or SIGTERM is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received SIGINT (Ctrl+C), shutting down gracefully...");
        }
        _ = terminate => {
            info!("Received SIGTERM, shutting down gracefully...");
        }
    }
}

/// Main application entry point.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Early config resolution for show/check modes
    if args.show_config || args.check_config {
        let config = resolve_config(&args)?;

        if args.check_config {
            if let Err(e) = validate_effective_config(&config) {
                eprintln!("❌ Configuration invalid: {}", e);
                std::process::exit(1);
            }
            println!("✅ Configuration is valid");
            return Ok(());
        }

        return show_config(&config, args.config_format.clone());
    }

    // Writing a default config must work even when the current one is broken
    if let Some(Commands::Config {
        output,
        format,
        commented,
    }) = &args.command
    {
        return command_config(output.clone(), format.clone(), *commented);
    }

    let config = load_validated_config(&args)?;
    setup_logging(&config);

    // Handle subcommands
    if let Some(command) = &args.command {
        return match command {
            Commands::Show { group, state } => {
                command_show(group.clone(), state.clone(), &config).await
            }

            Commands::Groups { state } => command_groups(state.clone(), &config).await,

            Commands::GenerateTestdata {
                output,
                query_threads,
                pools,
                pool_size,
                singletons,
            } => command_generate_testdata(
                output.clone(),
                SnapshotShape {
                    query_threads: *query_threads,
                    pools: *pools,
                    pool_size: *pool_size,
                    singletons: *singletons,
                },
            ),

            Commands::Config { .. } => unreachable!("Config handled above"),
        };
    }

    // Server mode
    info!("Starting herakles-thread-inspector");

    let source = require_server_source(&config)?;
    let timeout = config
        .fetch_timeout_secs
        .unwrap_or(DEFAULT_FETCH_TIMEOUT_SECS);
    let fetcher = SnapshotFetcher::new(source, Duration::from_secs(timeout))?;
    info!("Snapshot source: {}", fetcher.source());

    let bind_ip_str = config
        .bind
        .clone()
        .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
    let port = config.port.unwrap_or(DEFAULT_PORT);

    let state = Arc::new(AppState {
        config: Arc::new(config),
        fetcher,
        health_stats: Arc::new(HealthStats::new()),
        start_time: Instant::now(),
    });

    let app = Router::new()
        .route("/", get(root_handler))
        .route("/threads", get(threads_handler))
        .route("/threads/groups", get(groups_handler))
        .route("/health", get(health_handler))
        .with_state(state);

    let addr: SocketAddr = format!("{}:{}", bind_ip_str, port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    info!(
        "herakles-thread-inspector listening on http://{}:{}",
        bind_ip_str, port
    );

    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                error!("Server error: {}", e);
                return Err(e.into());
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received, exiting...");
        }
    }

    info!("herakles-thread-inspector stopped gracefully");
    Ok(())
}
