//! Byte sources the readers pull chunks from.

use std::future::Future;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt};

use crate::error::{Result, TransportError};

/// Something that hands out chunks of console output.
///
/// Implemented by [`Session`](crate::transport::Session) for live
/// connections and by [`TimedReader`] for any `AsyncRead`.
pub trait ChunkSource: Send {
    /// Read at most `buf.len()` bytes. `Ok(0)` means the peer closed the
    /// stream.
    fn read_chunk(&mut self, buf: &mut [u8]) -> impl Future<Output = Result<usize>> + Send;
}

/// Wraps an `AsyncRead` and fails each read that blocks longer than the
/// configured timeout.
#[derive(Debug)]
pub struct TimedReader<R> {
    inner: R,
    timeout: Duration,
}

impl<R> TimedReader<R> {
    /// Create a reader that times out individual reads after `timeout`.
    pub fn new(inner: R, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    /// Get the per-read timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Unwrap the inner reader.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: AsyncRead + Unpin + Send> ChunkSource for TimedReader<R> {
    async fn read_chunk(&mut self, buf: &mut [u8]) -> Result<usize> {
        read_with_timeout(&mut self.inner, buf, self.timeout).await
    }
}

/// Single read bounded by `timeout`.
pub(crate) async fn read_with_timeout<R: AsyncRead + Unpin>(
    reader: &mut R,
    buf: &mut [u8],
    timeout: Duration,
) -> Result<usize> {
    match tokio::time::timeout(timeout, reader.read(buf)).await {
        Ok(Ok(n)) => Ok(n),
        Ok(Err(e)) => Err(TransportError::Io(e).into()),
        Err(_) => Err(TransportError::ReadTimeout(timeout).into()),
    }
}
