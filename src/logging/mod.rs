//! Logging and observability
//!
//! Structured logging built on `tracing`:
//! - Human-readable console output on stderr
//! - Optional JSON file logging with rotation
//! - `RUST_LOG` filter override
//!
//! # Example
//!
//! ```no_run
//! use chainsink::logging::init_logging;
//! use chainsink::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!(item_type = "block", count = 450, "Start exporting items");
//! ```

pub mod structured;

pub use structured::{init_logging, parse_log_level, LoggingGuard};

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use chainsink::log_error_with_context;
/// use chainsink::domain::SinkError;
///
/// let error = SinkError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}

/// Log progress through the input stream
///
/// # Example
///
/// ```no_run
/// use chainsink::log_batch_progress;
///
/// log_batch_progress!(3, 30_000);
/// ```
#[macro_export]
macro_rules! log_batch_progress {
    ($batch:expr, $items_so_far:expr) => {
        tracing::debug!(
            batch = $batch,
            items_so_far = $items_so_far,
            "Input batch exported"
        );
    };
}
