//! Response type for line-oriented console commands.

use std::time::Duration;

/// Response from a line-oriented command (`status`, `ps`, `help`, ...).
#[derive(Debug, Clone)]
pub struct Response {
    /// The command line that was sent.
    pub command: String,

    /// The command output (prompt removed, lines trimmed).
    pub result: String,

    /// Time taken for the whole exchange, connect to close.
    pub elapsed: Duration,

    /// Whether output was cut short by the buffer limit.
    pub truncated: bool,
}

impl Response {
    /// Create a new response.
    pub fn new(
        command: impl Into<String>,
        result: impl Into<String>,
        elapsed: Duration,
        truncated: bool,
    ) -> Self {
        Self {
            command: command.into(),
            result: result.into(),
            elapsed,
            truncated,
        }
    }

    /// Get the result lines as an iterator.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.result.lines()
    }

    /// Check if the result contains a substring.
    pub fn contains(&self, pattern: &str) -> bool {
        self.result.contains(pattern)
    }
}

impl std::fmt::Display for Response {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.result)
    }
}
