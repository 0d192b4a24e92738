//! Library side of the roster checker: configuration and logging.

pub mod config;
pub mod logging;
