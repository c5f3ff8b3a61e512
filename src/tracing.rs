//! Logging setup for the panel demo
//!
//! The library only emits events: drag start/end and attach/detach at
//! `debug`, discarded store failures at `warn`. This module decides where
//! they go.
//!
//! - Console: filtered by `RUST_LOG`, quiet (`warn`) by default. Use
//!   `RUST_LOG=panel_drag::draggable=debug` to follow a drag.
//! - File: `<config dir>/logs/panel-drag.log`, rotated daily, always at
//!   `debug` so a lost position can be traced after the fact.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Install the console and file layers.
///
/// Without a writable config directory only the console layer is installed.
pub fn init() {
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_line_number(true)
        .with_filter(console_filter);

    let file_layer = match crate::config_paths::ensure_logs_dir() {
        Ok(logs_dir) => {
            let file_appender = tracing_appender::rolling::daily(logs_dir, "panel-drag.log");
            Some(
                fmt::layer()
                    .with_writer(file_appender)
                    .with_ansi(false)
                    .with_target(true)
                    .with_line_number(true)
                    .with_filter(EnvFilter::new("debug")),
            )
        }
        Err(e) => {
            eprintln!("Warning: Could not initialize file logging: {}", e);
            None
        }
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();
}
