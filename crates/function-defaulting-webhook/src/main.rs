use std::{net::SocketAddr, path::PathBuf, sync::Arc};

use clap::Parser;
use snafu::{ResultExt as _, Snafu};
use stackable_function_defaulting::config::{DefaultingOptions, SharedDefaultingConfig};
use tokio::{
    net::TcpListener,
    signal::unix::{SignalKind, signal},
};
use tracing_subscriber::util::TryInitError;

use crate::logging::LogFormat;

mod logging;
mod reload;
mod server;

#[derive(Debug, Snafu)]
enum Error {
    #[snafu(display("failed to initialize logging"))]
    InitLogging { source: TryInitError },

    #[snafu(display("failed to load defaulting configuration"))]
    LoadConfig { source: reload::Error },

    #[snafu(display("failed to create signal handler"))]
    CreateSignalHandler { source: std::io::Error },

    #[snafu(display("failed to bind to {bind_address}"))]
    Bind {
        source: std::io::Error,
        bind_address: SocketAddr,
    },

    #[snafu(display("failed to serve HTTP requests"))]
    Serve { source: std::io::Error },
}

/// Mutating admission webhook which fills in missing resources and replica bounds of Functions.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// The address the webhook listens on. TLS has to be terminated in front of it.
    #[arg(long, env, default_value = "0.0.0.0:8443")]
    bind_address: SocketAddr,

    /// Format of the console log output.
    #[arg(long, env, default_value_t, value_enum)]
    log_format: LogFormat,

    /// Directory with one file per preset option, named like the option's flag. Files found there
    /// override the option values, and the directory is read again on SIGHUP.
    #[arg(long, env)]
    presets_dir: Option<PathBuf>,

    #[command(flatten)]
    defaulting: DefaultingOptions,
}

#[snafu::report]
#[tokio::main]
async fn main() -> Result<(), Error> {
    let cli = Cli::parse();

    logging::init(cli.log_format).context(InitLoggingSnafu)?;

    let defaulting_config =
        reload::load(&cli.defaulting, cli.presets_dir.as_deref()).context(LoadConfigSnafu)?;
    let shared_config = Arc::new(SharedDefaultingConfig::new(defaulting_config));

    let sighup = signal(SignalKind::hangup()).context(CreateSignalHandlerSnafu)?;
    tokio::spawn(reload::reload_on_hangup(
        sighup,
        Arc::clone(&shared_config),
        cli.defaulting,
        cli.presets_dir,
    ));

    // Register the signal handlers before serving, so no signal is missed
    let mut sigint = signal(SignalKind::interrupt()).context(CreateSignalHandlerSnafu)?;
    let mut sigterm = signal(SignalKind::terminate()).context(CreateSignalHandlerSnafu)?;
    let shutdown = async move {
        tokio::select! {
            _ = sigint.recv() => tracing::debug!("received SIGINT"),
            _ = sigterm.recv() => tracing::debug!("received SIGTERM"),
        }
        tracing::info!("shutting down");
    };

    let listener = TcpListener::bind(cli.bind_address)
        .await
        .context(BindSnafu {
            bind_address: cli.bind_address,
        })?;
    tracing::info!(
        bind_address = %cli.bind_address,
        path = server::MUTATE_PATH,
        "serving function defaulting webhook"
    );

    axum::serve(listener, server::router(shared_config))
        .with_graceful_shutdown(shutdown)
        .await
        .context(ServeSnafu)
}
