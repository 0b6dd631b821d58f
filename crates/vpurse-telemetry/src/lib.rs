//! # vpurse Telemetry
//!
//! Structured logging for the vpurse module and the processes hosting it.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use vpurse_telemetry::{init_logging, TelemetryConfig};
//!
//! fn main() {
//!     let config = TelemetryConfig::from_env();
//!     let _guard = init_logging(&config).expect("Failed to init logging");
//!
//!     // run blocks
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `VPURSE_SERVICE_NAME` | `vpurse` | Service name attached to logs |
//! | `VPURSE_LOG_LEVEL` / `RUST_LOG` | `info` | Log level filter |
//! | `VPURSE_JSON_LOGS` | `false` | Emit JSON lines instead of pretty output |
//! | `VPURSE_CONSOLE_OUTPUT` | `true` | Write logs to stdout at all |
//! | `VPURSE_NETWORK` | `localnet` | Network name attached to logs |

mod config;
mod logging;

pub use config::TelemetryConfig;
pub use logging::{init_logging, LoggingGuard};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to initialize logger: {0}")]
    LoggerInit(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Span carrying the module name and any extra fields.
///
/// # Example
///
/// ```rust,ignore
/// use vpurse_telemetry::module_span;
///
/// let span = module_span!("end_block", module = "vpurse", block_height = 12345);
/// let _enter = span.enter();
/// ```
#[macro_export]
macro_rules! module_span {
    ($name:expr, $($field:tt)*) => {
        tracing::info_span!($name, $($field)*)
    };
}

/// Log a block-scoped event with the standard `module` and `block_height`
/// fields.
///
/// ```rust,ignore
/// log_block_event!(info, "vpurse", "Delivered balance update", 42, addresses = 2);
/// ```
#[macro_export]
macro_rules! log_block_event {
    ($level:ident, $module:expr, $msg:expr, $block_height:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            module = $module,
            block_height = $block_height,
            $($($field)*,)?
            $msg
        )
    };
}
