//! # dubbo-telnet
//!
//! Async client for the Dubbo administrative telnet console.
//!
//! The console speaks a line-oriented text protocol with no framing: a
//! command's output simply ends where the `dubbo>` prompt appears. This crate
//! opens one TCP session per command, reads bounded chunks until the prompt
//! (or a byte ceiling, or end of stream), and turns the output into typed
//! results.
//!
//! ## Features
//!
//! - One connection per command, always closed before the call returns
//! - Prompt detection across read boundaries
//! - Incremental `ls` parsing that reassembles names split across reads
//! - `invoke` result and elapsed-time extraction
//! - Line-oriented `status`, `ps`, `trace`, `count`, `help`, ...
//! - Typed errors that separate "could not talk to the console" from
//!   "the console answered with something unparsable"
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use dubbo_telnet::ClientBuilder;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), dubbo_telnet::Error> {
//!     let client = ClientBuilder::new("127.0.0.1").port(20880).build()?;
//!
//!     let services = client.services().await?;
//!     println!("{:?}", services.into_vec());
//!
//!     let status = client.status().await?;
//!     println!("{}", status);
//!     Ok(())
//! }
//! ```

pub mod channel;
pub mod client;
pub mod error;
pub mod history;
pub mod monitor;
pub mod transport;

// Re-export main types for convenience
pub use channel::{ReadState, Sentinel};
pub use client::{
    ClientBuilder, Command, CommandRequest, ConsoleClient, InvokeResult, Listing, NameList,
    Response,
};
pub use error::{Error, ErrorKind};
pub use history::{ExecuteRecord, HistoryStore, MemoryHistory, NewExecuteRecord};
pub use monitor::MonitorService;
pub use transport::{ConsoleConfig, Session};
