//! Structured logging for the TechStore client tools.
//!
//! This crate provides:
//! - `SessionId` - Correlation id for one browsing/CLI session
//! - `StructuredLogger` - Structured logging with session context
//! - `LogBuilder` - Fluent construction of log records with fields
//! - `CapturedLines` - In-memory sink for asserting on log output in tests

mod logging;
mod session;

pub use logging::*;
pub use session::*;
