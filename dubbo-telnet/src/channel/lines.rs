//! Line-oriented reader for simple console commands.

use bytes::BytesMut;
use log::{debug, warn};

use super::reader::ReadState;
use super::sentinel::Sentinel;
use super::source::ChunkSource;
use crate::error::Result;

/// Output of a line-oriented command.
#[derive(Debug, Clone)]
pub struct LineOutput {
    /// Lines before the prompt line, each trimmed of trailing whitespace.
    pub lines: Vec<String>,

    /// Terminal state of the read loop.
    pub state: ReadState,
}

impl LineOutput {
    /// Lines joined with `\n`, surrounding whitespace trimmed.
    pub fn text(&self) -> String {
        self.lines.join("\n").trim().to_string()
    }
}

/// Reads whole lines until one begins with the prompt.
///
/// The console does not terminate its final prompt with a newline, so an
/// unterminated trailing line that begins with the prompt also ends the
/// response.
pub struct LineReader<'a, S> {
    source: &'a mut S,
    sentinel: &'a Sentinel,
    chunk: Vec<u8>,
    partial: BytesMut,
    lines: Vec<String>,
    max_size: usize,
    total_read: usize,
}

impl<'a, S: ChunkSource> LineReader<'a, S> {
    pub fn new(
        source: &'a mut S,
        sentinel: &'a Sentinel,
        chunk_size: usize,
        max_size: usize,
    ) -> Self {
        Self {
            source,
            sentinel,
            chunk: vec![0; chunk_size.max(1)],
            partial: BytesMut::new(),
            lines: Vec::new(),
            max_size,
            total_read: 0,
        }
    }

    /// Read lines until the prompt line, the byte ceiling, or end of stream.
    pub async fn read_lines(mut self) -> Result<LineOutput> {
        loop {
            let n = self.source.read_chunk(&mut self.chunk).await?;
            if n == 0 {
                debug!("stream closed before prompt line");
                self.push_partial();
                return Ok(self.finish(ReadState::StreamClosed));
            }

            self.partial.extend_from_slice(&self.chunk[..n]);
            while let Some(end) = memchr::memchr(b'\n', &self.partial) {
                let line = self.partial.split_to(end + 1);
                if self.sentinel.starts_line(&line) {
                    return Ok(self.finish(ReadState::SentinelFound));
                }
                self.lines.push(decode_line(&line));
            }
            if self.sentinel.starts_line(&self.partial) {
                return Ok(self.finish(ReadState::SentinelFound));
            }

            self.total_read += n;
            if self.total_read >= self.max_size {
                warn!(
                    "read {} bytes without a prompt line, stopping at buffer limit {}",
                    self.total_read, self.max_size
                );
                self.push_partial();
                return Ok(self.finish(ReadState::BufferExceeded));
            }
        }
    }

    fn push_partial(&mut self) {
        if !self.partial.is_empty() {
            let line = self.partial.split();
            self.lines.push(decode_line(&line));
        }
    }

    fn finish(self, state: ReadState) -> LineOutput {
        LineOutput {
            lines: self.lines,
            state,
        }
    }
}

fn decode_line(line: &[u8]) -> String {
    String::from_utf8_lossy(line).trim_end().to_string()
}
