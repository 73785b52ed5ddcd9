//! High-level client for the administrative console.
//!
//! The client layer turns console commands into typed results: name lists
//! for `ls`, [`InvokeResult`] for `invoke`, and plain [`Response`] text for
//! everything else.

mod builder;
mod command;
mod console;
mod invoke;
mod names;
mod response;

pub use builder::ClientBuilder;
pub use command::{Command, CommandRequest};
pub use console::ConsoleClient;
pub use invoke::{InvokeResult, parse_invoke_result, parse_truncated_invoke_result};
pub use names::{Listing, NameCollector, NameList, extract_names, short_name};
pub use response::Response;
