//! Channel layer: reading console output up to the prompt.
//!
//! This module turns a stream of partial socket reads into complete
//! responses, using the console prompt as the only end-of-output marker.

mod lines;
mod reader;
mod sentinel;
pub(crate) mod source;

pub use lines::{LineOutput, LineReader};
pub use reader::{PromptReader, RawResponse, ReadState};
pub use sentinel::Sentinel;
pub use source::{ChunkSource, TimedReader};
