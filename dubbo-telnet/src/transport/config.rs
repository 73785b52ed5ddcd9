//! Console connection configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default console host.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default console port.
pub const DEFAULT_PORT: u16 = 31361;

/// Prompt printed by the console after every command.
pub const DEFAULT_PROMPT: &str = "dubbo>";

/// Connection and read-loop settings for the administrative console.
///
/// Every field has a default, so a partial document deserializes:
///
/// ```rust
/// use dubbo_telnet::ConsoleConfig;
///
/// let config = ConsoleConfig::default();
/// assert_eq!(config.prompt, "dubbo>");
/// assert_eq!(config.max_buffer_size, 8192);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Console host (hostname or IP address).
    pub host: String,

    /// Console port.
    pub port: u16,

    /// Connect timeout and per-read timeout.
    ///
    /// The timeout applies to each read on its own, not to the response as a
    /// whole. A console that keeps sending bytes without the prompt is
    /// stopped by `max_buffer_size` instead.
    #[serde(with = "millis")]
    pub timeout: Duration,

    /// Ceiling on bytes read for one command. Reaching it stops the read
    /// loop and keeps what was read.
    pub max_buffer_size: usize,

    /// Read size for service/method listings.
    pub list_chunk_size: usize,

    /// Read size for `invoke`.
    pub invoke_chunk_size: usize,

    /// Read size for line-oriented commands.
    pub line_chunk_size: usize,

    /// Console prompt marking the end of a command's output.
    pub prompt: String,
}

impl ConsoleConfig {
    /// Get the socket address for connection.
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            timeout: Duration::from_millis(3000),
            max_buffer_size: 8192,
            list_chunk_size: 1024,
            invoke_chunk_size: 4096,
            line_chunk_size: 1024,
            prompt: DEFAULT_PROMPT.to_string(),
        }
    }
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
