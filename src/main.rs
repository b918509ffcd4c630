// Sana - terminal chat client for the Sana health-assistant backend
//
// Architecture:
// - Conversation: ordered turns plus the busy gate (the behavioral core)
// - Client (reqwest): one POST per turn to the chat endpoint
// - TUI (ratatui): renders state, owns the single-threaded event loop
// - Event system: an mpsc channel posts send-task completions back to the loop

mod cli;
mod client;
mod config;
mod conversation;
mod events;
mod logging;
mod tui;

use anyhow::Result;
use client::ApiClient;
use config::{Config, LogRotation};
use logging::{LogBuffer, TuiLogLayer};
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use tui::app::App;
use tui::theme::ThemeKind;

/// Initialize tracing.
///
/// Logs always go to the in-memory buffer the TUI renders (writing to stdout
/// would garble the alternate screen). File logging is optional: JSON format,
/// non-blocking writer, rotation per config. The returned guard must stay
/// alive for the duration of the program so file logs flush.
///
/// Filter precedence: RUST_LOG env var > config level.
fn init_tracing(
    config: &Config,
    log_buffer: &LogBuffer,
) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let default_filter = format!("sana={}", config.logging.level);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into());

    let file_writer = if config.logging.file_enabled {
        match std::fs::create_dir_all(&config.logging.file_dir) {
            Ok(()) => {
                let appender = match config.logging.file_rotation {
                    LogRotation::Hourly => tracing_appender::rolling::hourly(
                        &config.logging.file_dir,
                        &config.logging.file_prefix,
                    ),
                    LogRotation::Daily => tracing_appender::rolling::daily(
                        &config.logging.file_dir,
                        &config.logging.file_prefix,
                    ),
                    LogRotation::Never => tracing_appender::rolling::never(
                        &config.logging.file_dir,
                        &config.logging.file_prefix,
                    ),
                };
                Some(tracing_appender::non_blocking(appender))
            }
            Err(e) => {
                eprintln!(
                    "Warning: could not create log directory {:?}: {}",
                    config.logging.file_dir, e
                );
                None
            }
        }
    } else {
        None
    };

    match file_writer {
        Some((non_blocking, guard)) => {
            tracing_subscriber::registry()
                .with(filter)
                .with(TuiLogLayer::new(log_buffer.clone()))
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(non_blocking)
                        .with_ansi(false),
                )
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(TuiLogLayer::new(log_buffer.clone()))
                .init();
            None
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Handle CLI commands first (config --show, --reset, --edit, --path)
    // If a command was handled, exit early
    if cli::handle_cli() {
        return Ok(());
    }

    // Ensure config template exists (helps users discover options)
    Config::ensure_config_exists();

    let config = Config::from_env();

    let log_buffer = LogBuffer::new();
    let _file_guard = init_tracing(&config, &log_buffer);

    tracing::info!("sana {} starting", config::VERSION);
    tracing::info!("chat backend: {}", config.api_url);

    // Completion events flow from the send task back to the event loop
    let (event_tx, event_rx) = mpsc::channel(16);

    let client = ApiClient::new(&config.api_url, config.user_id.clone());
    let theme = ThemeKind::from_name(&config.theme).theme();
    let app = App::new(client, event_tx, log_buffer, theme);

    // Runs until the user quits
    tui::run_tui(app, event_rx).await?;

    tracing::info!("shutdown complete");
    Ok(())
}
