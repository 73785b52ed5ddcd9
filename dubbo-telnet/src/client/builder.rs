//! Builder for creating console clients.

use std::time::Duration;

use super::console::ConsoleClient;
use crate::error::Result;
use crate::transport::config::ConsoleConfig;

/// Builder for constructing a [`ConsoleClient`].
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use dubbo_telnet::ClientBuilder;
///
/// # fn example() -> Result<(), dubbo_telnet::Error> {
/// let client = ClientBuilder::new("10.0.0.5")
///     .port(20880)
///     .timeout(Duration::from_secs(5))
///     .build()?;
/// assert_eq!(client.config().port, 20880);
/// # Ok(())
/// # }
/// # example().unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct ClientBuilder {
    config: ConsoleConfig,
}

impl ClientBuilder {
    /// Create a new builder for the specified host, other settings default.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            config: ConsoleConfig {
                host: host.into(),
                ..ConsoleConfig::default()
            },
        }
    }

    /// Start from an existing configuration.
    pub fn from_config(config: ConsoleConfig) -> Self {
        Self { config }
    }

    /// Set the console port.
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Set the connect and read timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the per-command byte ceiling.
    pub fn max_buffer_size(mut self, size: usize) -> Self {
        self.config.max_buffer_size = size;
        self
    }

    /// Set the read sizes for listings, invokes and line commands.
    pub fn chunk_sizes(mut self, list: usize, invoke: usize, line: usize) -> Self {
        self.config.list_chunk_size = list;
        self.config.invoke_chunk_size = invoke;
        self.config.line_chunk_size = line;
        self
    }

    /// Set the console prompt (default `dubbo>`).
    pub fn prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.prompt = prompt.into();
        self
    }

    /// Build the client.
    ///
    /// This validates the configuration but does not connect; every command
    /// opens its own connection.
    pub fn build(self) -> Result<ConsoleClient> {
        ConsoleClient::new(self.config)
    }
}
