//! Logging setup for console and optional file output

use crate::error::Result;
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Initialize tracing with a console layer and, when `log_path` is given, an
/// ANSI-free file layer appended to the same subscriber.
pub fn init(log_path: Option<&Path>, verbose: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::new("snapsweep=debug")
    } else {
        EnvFilter::new("snapsweep=info")
    };

    let console = fmt::layer().with_target(false);

    match log_path {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            let file_layer = fmt::layer()
                .with_writer(Arc::new(file))
                .with_ansi(false)
                .with_target(false);
            tracing_subscriber::registry()
                .with(filter)
                .with(console)
                .with(file_layer)
                .init();
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(console)
                .init();
        }
    }

    Ok(())
}
