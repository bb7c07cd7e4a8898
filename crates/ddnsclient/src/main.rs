// # ddnsclient - dynamic DNS update daemon
//
// Thin integration layer. The polling loop, change detection and update
// logic live in ddnsclient-core; this binary only:
//
// 1. Parses flags, environment and the optional TOML config file
// 2. Initializes logging
// 3. Wires the reqwest client and tracing observer into the daemon
// 4. Translates SIGTERM/SIGINT into a shutdown request
//
// ## Example
//
// ```bash
// ddnsclient -s members.dyndns.org -u user -p secret \
//     -w https://api.ipify.org -6 https://api6.ipify.org
// ```

mod cli;
mod config;

use anyhow::{Context, Result};
use clap::Parser;
use ddnsclient_core::{DdnsConfig, PollingDaemon, ShutdownController, TracingObserver};
use ddnsclient_http::ReqwestHttpClient;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{Level, debug, error, info};
use tracing_subscriber::FmtSubscriber;

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

use crate::cli::Cli;

/// Exit codes for different termination scenarios
///
/// These codes follow systemd conventions:
/// - 0: Clean shutdown
/// - 1: Configuration or startup error
/// - 2: Runtime error (address discovery failed)
#[derive(Debug, Clone, Copy)]
enum DdnsExitCode {
    /// Clean shutdown (normal exit)
    CleanShutdown = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error
    RuntimeError = 2,
}

impl From<DdnsExitCode> for ExitCode {
    fn from(code: DdnsExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match config::load(&cli) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {:#}", e);
            return DdnsExitCode::ConfigError.into();
        }
    };

    let log_level = if config.debug { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return DdnsExitCode::ConfigError.into();
    }

    info!("Starting ddnsclient version {}", env!("CARGO_PKG_VERSION"));
    debug!("Configuration: {:?}", config);

    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return DdnsExitCode::RuntimeError.into();
        }
    };

    rt.block_on(run_daemon(config)).into()
}

/// Build the daemon, run it until shutdown or a fatal error
async fn run_daemon(config: DdnsConfig) -> DdnsExitCode {
    let shutdown = ShutdownController::new();

    let mut daemon = match build_daemon(config, shutdown.clone()) {
        Ok(daemon) => daemon,
        Err(e) => {
            error!("Startup error: {:#}", e);
            return DdnsExitCode::ConfigError;
        }
    };

    let signals = match forward_signals(shutdown) {
        Ok(handle) => handle,
        Err(e) => {
            error!("Startup error: {:#}", e);
            return DdnsExitCode::ConfigError;
        }
    };

    let result = daemon.run().await;
    signals.abort();

    match result {
        Ok(()) => DdnsExitCode::CleanShutdown,
        Err(e) => {
            error!("Daemon error: {}", e);
            DdnsExitCode::RuntimeError
        }
    }
}

fn build_daemon(config: DdnsConfig, shutdown: ShutdownController) -> Result<PollingDaemon> {
    let client = ReqwestHttpClient::from_config(&config)?;
    let daemon = PollingDaemon::from_config(
        config,
        Arc::new(client),
        Arc::new(TracingObserver),
        shutdown,
    )?;
    Ok(daemon)
}

/// Install SIGTERM/SIGINT handlers and forward them to the shutdown
/// controller
///
/// Handlers are installed before returning so that setup failures surface
/// as startup errors.
#[cfg(unix)]
fn forward_signals(shutdown: ShutdownController) -> Result<JoinHandle<()>> {
    let mut sigterm = signal(SignalKind::terminate()).context("Failed to setup SIGTERM handler")?;
    let mut sigint = signal(SignalKind::interrupt()).context("Failed to setup SIGINT handler")?;

    Ok(tokio::spawn(async move {
        loop {
            let name = tokio::select! {
                _ = sigterm.recv() => "SIGTERM",
                _ = sigint.recv() => "SIGINT",
            };
            info!("Shutting down: {}", name);
            shutdown.signal(name);
        }
    }))
}

/// Fallback for non-Unix platforms: CTRL-C only
#[cfg(not(unix))]
fn forward_signals(shutdown: ShutdownController) -> Result<JoinHandle<()>> {
    Ok(tokio::spawn(async move {
        loop {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to wait for CTRL-C: {}", e);
                return;
            }
            info!("Shutting down: SIGINT");
            shutdown.signal("SIGINT");
        }
    }))
}
