//! # docgen telemetry
//!
//! Structured logging and distributed tracing for the docgen service.
//!
//! ## Features
//! - Structured logging with `tracing`, pretty or JSON output
//! - Optional OTLP span export
//! - Span helpers for requests, backend fetches and model calls
//!
//! ## Usage
//!
//! ```rust
//! use docgen_telemetry::{init_telemetry, info, instrument};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     init_telemetry("docgen")?;
//!
//!     #[instrument]
//!     async fn handler() {
//!         info!("handling request");
//!     }
//!     Ok(())
//! }
//! ```

pub mod init;
pub mod spans;

// Re-export tracing macros for convenience
pub use tracing::{Instrument, Span, debug, error, info, instrument, trace, warn};

pub use spans::*;

pub use init::{
    LOG_FORMAT_ENV, LogFormat, init_telemetry, init_with_format, init_with_otlp,
    shutdown_telemetry,
};
