//! Prompt-terminated chunk reader.
//!
//! The console has no length framing: a response ends when the prompt shows
//! up in the stream. [`PromptReader`] pulls bounded chunks from a
//! [`ChunkSource`] and hands out the bytes that precede the prompt, one
//! segment per read.
//!
//! A chunk that ends with the first bytes of the prompt (`...\r\ndub`) has
//! those bytes held back and re-scanned together with the next chunk, so a
//! prompt split across two reads is still found and never leaks into the
//! output.

use bytes::{Bytes, BytesMut};
use log::{debug, trace, warn};

use super::sentinel::Sentinel;
use super::source::ChunkSource;
use crate::error::Result;

/// Where the read loop stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadState {
    /// Still reading; the prompt has not been seen.
    Accumulating,
    /// The prompt was found; the response is complete.
    SentinelFound,
    /// The byte ceiling was reached before the prompt.
    BufferExceeded,
    /// The peer closed the stream before the prompt.
    StreamClosed,
}

impl ReadState {
    /// Whether the read loop has stopped.
    pub fn is_finished(self) -> bool {
        self != ReadState::Accumulating
    }

    /// Whether output was cut short by the byte ceiling.
    pub fn is_truncated(self) -> bool {
        self == ReadState::BufferExceeded
    }
}

/// Text captured before the prompt, with the reason reading stopped.
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// Captured output (lossy UTF-8).
    pub text: String,

    /// Terminal state of the read loop.
    pub state: ReadState,
}

impl RawResponse {
    /// Whether output was cut short by the byte ceiling.
    pub fn is_truncated(&self) -> bool {
        self.state.is_truncated()
    }
}

/// Reads chunks until the prompt, the byte ceiling, or end of stream.
pub struct PromptReader<'a, S> {
    source: &'a mut S,
    sentinel: &'a Sentinel,
    chunk: Vec<u8>,
    held: BytesMut,
    max_size: usize,
    total_read: usize,
    state: ReadState,
}

impl<'a, S: ChunkSource> PromptReader<'a, S> {
    /// Create a reader pulling at most `chunk_size` bytes per read and
    /// stopping once `max_size` bytes have been read.
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
            held: BytesMut::new(),
            max_size,
            total_read: 0,
            state: ReadState::Accumulating,
        }
    }

    /// Get the next segment of output, or `None` once reading has stopped.
    ///
    /// Segments may be empty while the reader holds back a possible prompt
    /// prefix. After `None`, [`state`](Self::state) says why reading stopped.
    pub async fn next_segment(&mut self) -> Result<Option<Bytes>> {
        if self.state.is_finished() {
            return Ok(None);
        }

        let n = self.source.read_chunk(&mut self.chunk).await?;
        if n == 0 {
            self.state = ReadState::StreamClosed;
            debug!(
                "stream closed before prompt after {} bytes",
                self.total_read
            );
            return Ok(self.flush_held());
        }

        let mut window = std::mem::take(&mut self.held);
        window.extend_from_slice(&self.chunk[..n]);

        if let Some(pos) = self.sentinel.find(&window) {
            self.state = ReadState::SentinelFound;
            window.truncate(pos);
            trace!("prompt found after {} bytes", self.total_read + n);
            return Ok(Some(window.freeze()).filter(|b| !b.is_empty()));
        }

        self.total_read += n;
        if self.total_read >= self.max_size {
            self.state = ReadState::BufferExceeded;
            warn!(
                "read {} bytes without a prompt, stopping at buffer limit {}",
                self.total_read, self.max_size
            );
            return Ok(Some(window.freeze()));
        }

        let keep = self.sentinel.partial_suffix_len(&window);
        self.held = window.split_off(window.len() - keep);
        trace!("chunk: {} bytes, holding {} bytes", n, keep);

        Ok(Some(window.freeze()))
    }

    /// Read to the end and collect all segments into one payload.
    pub async fn read_to_end(mut self) -> Result<RawResponse> {
        let mut payload = BytesMut::new();
        while let Some(segment) = self.next_segment().await? {
            payload.extend_from_slice(&segment);
        }
        Ok(RawResponse {
            text: String::from_utf8_lossy(&payload).into_owned(),
            state: self.state,
        })
    }

    /// Current state of the read loop.
    pub fn state(&self) -> ReadState {
        self.state
    }

    /// Total bytes read from the source so far, excluding the chunk that
    /// carried the prompt.
    pub fn total_read(&self) -> usize {
        self.total_read
    }

    fn flush_held(&mut self) -> Option<Bytes> {
        let held = std::mem::take(&mut self.held);
        (!held.is_empty()).then(|| held.freeze())
    }
}
