use std::sync::Arc;

use joblog_client::LogApi;
use joblog_console::config::ConsoleConfig;
use joblog_console::terminal::{CommandReader, TerminalView, HELP};
use joblog_console::{Console, ConsoleError};
use joblog_core::preferences::FilePreferenceStore;
use tokio::io::BufReader;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "joblog_console=info,joblog_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run().await {
        tracing::error!(error = %e, "Console failed");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), ConsoleError> {
    // --- Configuration ---
    let config = ConsoleConfig::from_env();
    tracing::info!(
        server_url = %config.server_url,
        preferences = %config.preferences_path.display(),
        "Loaded console configuration",
    );

    let api = LogApi::new(&config.server_url)?;
    let store = Arc::new(FilePreferenceStore::open(config.preferences_path.clone())?);
    let view = TerminalView::new(std::io::stdout());

    let console = Console::start(api, view, store).await?;
    eprintln!("{HELP}");
    console.refresh_logs().await;

    let commands = CommandReader::new(BufReader::new(tokio::io::stdin()));
    tokio::select! {
        () = Arc::clone(&console).run(commands) => {}
        () = shutdown_signal() => console.shutdown().await,
    }

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl-C handler");
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
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), shutting down");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, shutting down");
        }
    }
}
