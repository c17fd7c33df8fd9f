//! Development REPL Binary
//!
//! Interactive terminal front end for the node store. Reads one command per
//! line from stdin, applies it, and prints the resulting view.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin dev-repl
//!
//! # Log every store transition
//! RUST_LOG=debug cargo run --bin dev-repl
//! ```
//!
//! # Environment Variables
//!
//! - `DOMTREE_ROOT_ID`, `DOMTREE_PROTECT_ROOT`, `DOMTREE_EVENT_CAPACITY`: store configuration
//! - `RUST_LOG`: Logging level (e.g., "info", "debug", "trace")

use domtree_core::services::NodeStore;
use domtree_dev_tools::config::store_config_from_env;
use domtree_dev_tools::{Command, Outcome, Session};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::broadcast::error::TryRecvError;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout stays clean for views
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let store = NodeStore::with_config(store_config_from_env())?;
    tracing::info!(
        "domtree dev REPL (root: {}, protected: {})",
        store.config().root_id,
        store.config().protect_root
    );
    let mut events = store.subscribe_to_events();
    let mut session = Session::new(store);

    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    stdout.write_all(b"Type 'help' for commands.\n").await?;
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let output = match Command::parse(&line) {
            Ok(command) => match session.execute(command) {
                Outcome::Continue(output) => output,
                Outcome::Quit => break,
            },
            Err(e) => format!("error: {}", e),
        };

        // Drain events so subscribers never lag; node changes invalidate the diagram.
        loop {
            match events.try_recv() {
                Ok(event) if event.touches_nodes() => {
                    tracing::debug!("store event: {}, diagram stale", event.event_type())
                }
                Ok(event) => tracing::debug!("store event: {}", event.event_type()),
                Err(TryRecvError::Lagged(skipped)) => {
                    tracing::warn!("Event receiver lagged, skipped {} event(s)", skipped)
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }

        stdout.write_all(output.trim_end().as_bytes()).await?;
        stdout.write_all(b"\n").await?;
        stdout.flush().await?;
    }

    tracing::info!("Bye");
    Ok(())
}
