//! Structured logging for schema and config events.

mod logger;

pub use logger::{Logger, Severity};
