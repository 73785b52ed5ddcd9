//! Fixed-string prompt detection.

use memchr::memmem::Finder;

/// The console prompt that terminates every command's output.
///
/// The console prints a literal prompt (`dubbo>`) rather than a pattern, so
/// detection is a substring search.
#[derive(Debug, Clone)]
pub struct Sentinel {
    finder: Finder<'static>,
}

impl Sentinel {
    /// Build a sentinel for the given prompt text.
    pub fn new(prompt: &str) -> Self {
        Self {
            finder: Finder::new(prompt.as_bytes()).into_owned(),
        }
    }

    /// The prompt bytes.
    pub fn as_bytes(&self) -> &[u8] {
        self.finder.needle()
    }

    /// Length of the prompt in bytes.
    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    /// Whether the prompt is empty (such a sentinel matches everywhere).
    pub fn is_empty(&self) -> bool {
        self.as_bytes().is_empty()
    }

    /// Offset of the first occurrence of the prompt in `data`.
    pub fn find(&self, data: &[u8]) -> Option<usize> {
        self.finder.find(data)
    }

    /// Whether a console line is a prompt line.
    pub fn starts_line(&self, line: &[u8]) -> bool {
        line.starts_with(self.as_bytes())
    }

    /// Length of the longest suffix of `data` that is a proper prefix of the
    /// prompt. Those bytes may be the start of a prompt split across reads.
    pub fn partial_suffix_len(&self, data: &[u8]) -> usize {
        let needle = self.as_bytes();
        let longest = needle.len().saturating_sub(1).min(data.len());
        (1..=longest)
            .rev()
            .find(|&k| data.ends_with(&needle[..k]))
            .unwrap_or(0)
    }
}

impl Default for Sentinel {
    fn default() -> Self {
        Self::new(crate::transport::config::DEFAULT_PROMPT)
    }
}
