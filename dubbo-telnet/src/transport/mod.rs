//! TCP transport to the administrative console.
//!
//! This module provides the per-command socket session: connect, write a
//! line, read with a timeout, close.

pub mod config;
mod session;

pub use config::ConsoleConfig;
pub use session::Session;
