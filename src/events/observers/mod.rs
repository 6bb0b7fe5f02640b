//! Event Observers
//!
//! - `logging`: structured logging via tracing

pub mod logging;

pub use logging::LoggingObserver;
