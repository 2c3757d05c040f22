use dotenv::dotenv;
use otdb_console::{AppError, ElementIds, Settings, TerminalView, UiEvent};
use std::io::{self, BufRead};
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Reads stdin line by line, submitting each line as a request. Dropping the
/// sender when stdin ends is what closes the session.
/// Blocking reads, so this lives on its own thread.
fn spawn_stdin_reader(tx: mpsc::UnboundedSender<UiEvent>) {
    std::thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            match line {
                Ok(line) => {
                    if tx.send(UiEvent::Submit(line)).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    warn!("Failed to read stdin: {}", e);
                    break;
                }
            }
        }
    });
}

#[tokio::main]
async fn main() -> otdb_console::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Load configuration
    let config = Settings::new()?;

    // Initialize logging; RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log.level))
        .map_err(|e| AppError::ConfigError(format!("log.level: {}", e)))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    info!(
        "{} {} starting ({} environment)",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        config.environment
    );

    let view = TerminalView::new(ElementIds::from(config.ui.element_ids));
    let (mut widget, client) = otdb_console::session(&config, view);

    let (tx, rx) = mpsc::unbounded_channel();
    spawn_stdin_reader(tx);

    client.run(&mut widget, rx).await?;

    info!("Session {} finished", widget.id());
    Ok(())
}
