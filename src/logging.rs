use std::fs;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initializes the logging system with both console and file output.
pub fn init_logging() {
    let _ = fs::create_dir_all("logs");

    // Daily rotation, written off the main thread
    let file_appender = tracing_appender::rolling::daily("logs", "gsw_analytics.log");
    let (non_blocking_writer, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer().json().with_writer(non_blocking_writer);

    // Console output goes to stderr so reports on stdout stay clean
    let console_layer = fmt::layer().with_writer(std::io::stderr).with_target(false);

    let mut filter = EnvFilter::from_default_env();
    if let Ok(directive) = "gsw_analytics=info".parse() {
        filter = filter.add_directive(directive);
    }

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(console_layer)
        .init();

    // The guard must outlive main or buffered lines are lost
    std::mem::forget(guard);
}
