//! Structured logging for hall-scout.
//!
//! Provides dual-mode logging:
//! - Human-readable console output for interactive use
//! - Machine-parseable JSONL for scripted runs
//!
//! # Usage
//!
//! ```ignore
//! use hs_core::logging::{init_logging, LogConfig, LogContext, Stage, event_names};
//!
//! let config = LogConfig::from_env(None, None);
//! init_logging(&config);
//!
//! let ctx = LogContext::new(generate_run_id(), get_host_id());
//! log_event!(ctx, INFO, event_names::RUN_STARTED, Stage::Init, "Starting analysis");
//! ```
//!
//! stdout is reserved for command payloads (JSON/MD output); every log line
//! goes to stderr. Per-row data-quality drops are emitted at debug level only.

pub mod config;
pub mod events;

pub use config::{LogConfig, LogFormat, LogLevel};
pub use events::{event_names, LogContext, Stage};

use std::io::IsTerminal;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Initialize the logging subsystem.
///
/// Must be called once at startup before any logging occurs. A second call
/// is ignored.
pub fn init_logging(config: &LogConfig) {
    let filter = if std::env::var_os("HS_LOG").is_some() {
        EnvFilter::new(config.level.to_string())
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.level.to_string()))
    };

    let result = match config.format {
        LogFormat::Human => {
            let use_ansi = std::io::stderr().is_terminal();
            let fmt_layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_file(config.source_location)
                .with_line_number(config.source_location)
                .with_ansi(use_ansi);

            if config.timestamps {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt_layer)
                    .try_init()
            } else {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt_layer.without_time())
                    .try_init()
            }
        }
        LogFormat::Jsonl => {
            let json_layer = fmt::layer()
                .json()
                .flatten_event(true)
                .with_current_span(false)
                .with_writer(std::io::stderr);
            tracing_subscriber::registry()
                .with(filter)
                .with(json_layer)
                .try_init()
        }
    };
    // Already initialized (tests, embedding callers).
    let _ = result;
}

/// Generate a unique run ID for this invocation.
pub fn generate_run_id() -> String {
    let uuid = uuid::Uuid::new_v4();
    format!("run-{}", &uuid.simple().to_string()[..12])
}

/// Host identifier for log correlation.
pub fn get_host_id() -> String {
    if let Ok(id) = std::fs::read_to_string("/etc/machine-id") {
        let id = id.trim();
        if id.len() >= 8 && id.is_ascii() {
            return format!("host-{}", &id[..8]);
        }
    }
    format!("host-{}", &uuid::Uuid::new_v4().simple().to_string()[..8])
}

/// Structured event logging with run context and stage.
///
/// ```ignore
/// log_event!(ctx, INFO, event_names::FETCH_SOURCE_LOADED, Stage::Fetch, "source loaded",
///     label = "2/7", rows = 120);
/// ```
#[macro_export]
macro_rules! log_event {
    ($ctx:expr, INFO, $event:expr, $stage:expr, $msg:expr $(, $key:ident = $val:expr)*) => {
        tracing::info!(
            target: $event,
            run_id = %$ctx.run_id,
            host_id = %$ctx.host_id,
            stage = %$stage,
            $($key = $val,)*
            "{}", $msg
        )
    };
    ($ctx:expr, DEBUG, $event:expr, $stage:expr, $msg:expr $(, $key:ident = $val:expr)*) => {
        tracing::debug!(
            target: $event,
            run_id = %$ctx.run_id,
            host_id = %$ctx.host_id,
            stage = %$stage,
            $($key = $val,)*
            "{}", $msg
        )
    };
    ($ctx:expr, WARN, $event:expr, $stage:expr, $msg:expr $(, $key:ident = $val:expr)*) => {
        tracing::warn!(
            target: $event,
            run_id = %$ctx.run_id,
            host_id = %$ctx.host_id,
            stage = %$stage,
            $($key = $val,)*
            "{}", $msg
        )
    };
    ($ctx:expr, ERROR, $event:expr, $stage:expr, $msg:expr $(, $key:ident = $val:expr)*) => {
        tracing::error!(
            target: $event,
            run_id = %$ctx.run_id,
            host_id = %$ctx.host_id,
            stage = %$stage,
            $($key = $val,)*
            "{}", $msg
        )
    };
}
