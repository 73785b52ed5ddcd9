//! Single-use TCP session to the console.

use std::time::Duration;

use log::{debug, trace, warn};
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;

use crate::channel::ChunkSource;
use crate::channel::source::read_with_timeout;
use crate::error::{Result, TransportError};

/// One connection for one command/response exchange.
///
/// A session cannot be reopened once closed. Callers close it explicitly on
/// every path; dropping an open session still releases the socket but logs
/// a warning.
pub struct Session {
    /// The socket (None once closed).
    stream: Option<TcpStream>,

    /// `host:port`, for log messages.
    peer: String,

    /// How long a single read may block.
    read_timeout: Duration,
}

impl Session {
    /// Connect to the console. `timeout` bounds the connect and becomes the
    /// initial read timeout.
    pub async fn open(host: &str, port: u16, timeout: Duration) -> Result<Self> {
        let stream = tokio::time::timeout(timeout, TcpStream::connect((host, port)))
            .await
            .map_err(|_| TransportError::ConnectTimeout {
                host: host.to_string(),
                port,
                timeout,
            })?
            .map_err(|source| TransportError::ConnectionFailed {
                host: host.to_string(),
                port,
                source,
            })?;

        // Commands are single short lines; don't let Nagle hold them back.
        if let Err(e) = stream.set_nodelay(true) {
            debug!("failed to set TCP_NODELAY on {}:{}: {}", host, port, e);
        }

        debug!("session opened to {}:{}", host, port);

        Ok(Self {
            stream: Some(stream),
            peer: format!("{}:{}", host, port),
            read_timeout: timeout,
        })
    }

    /// Set how long a single read may block before failing.
    pub fn set_read_timeout(&mut self, timeout: Duration) {
        self.read_timeout = timeout;
    }

    /// Get the read timeout.
    pub fn read_timeout(&self) -> Duration {
        self.read_timeout
    }

    /// Write `text` followed by a newline and flush.
    pub async fn send_line(&mut self, text: &str) -> Result<()> {
        let stream = self.stream.as_mut().ok_or(TransportError::Closed)?;

        let mut line = Vec::with_capacity(text.len() + 1);
        line.extend_from_slice(text.as_bytes());
        line.push(b'\n');

        trace!("{} <- {:?}", self.peer, text);
        stream.write_all(&line).await.map_err(TransportError::Io)?;
        stream.flush().await.map_err(TransportError::Io)?;
        Ok(())
    }

    /// Close the connection. Calling this again does nothing.
    pub async fn close(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            if let Err(e) = stream.shutdown().await {
                debug!("shutdown of {} failed: {}", self.peer, e);
            }
            debug!("session to {} closed", self.peer);
        }
    }

    /// Whether the session has been closed.
    pub fn is_closed(&self) -> bool {
        self.stream.is_none()
    }

    /// The `host:port` this session talks to.
    pub fn peer(&self) -> &str {
        &self.peer
    }
}

impl ChunkSource for Session {
    async fn read_chunk(&mut self, buf: &mut [u8]) -> Result<usize> {
        let stream = self.stream.as_mut().ok_or(TransportError::Closed)?;
        let n = read_with_timeout(stream, buf, self.read_timeout).await?;
        trace!("{} -> {} bytes", self.peer, n);
        Ok(n)
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if self.stream.is_some() {
            warn!("session to {} dropped without close()", self.peer);
        }
    }
}
