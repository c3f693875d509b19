//! Tracing setup: structured JSON logs, optionally exported over OTLP.
//!
//! # Telemetry invariants
//!
//! - **No answer values, ciphertext or key material** in any span attribute
//!   or log field. Form IDs, field names and counts only.
//! - Log level is configurable via `LOG_LEVEL` (default: `info`).

pub mod init;

pub use init::init_telemetry;
