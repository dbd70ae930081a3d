#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! Observability: structured logging setup.

pub mod logging;

pub use logging::{init_logging, LoggingError};
