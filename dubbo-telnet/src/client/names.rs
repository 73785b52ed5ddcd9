//! Service and method name extraction for `ls` output.
//!
//! `ls` prints one dotted name per line (`com.foo.BarService`), and a name
//! can be split anywhere across two reads. [`NameCollector`] only tokenizes
//! text up to the last whitespace it has seen and carries the rest over to
//! the next segment, so a fragment like `com.foo.Bar` is never mistaken for
//! a complete name.

use bytes::BytesMut;
use indexmap::IndexSet;
use log::debug;
use serde::Serialize;

use crate::channel::ReadState;

/// Insertion-ordered short names, without duplicates or empty entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct NameList {
    names: IndexSet<String>,
}

impl NameList {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a name unless it is empty or already present. Returns whether
    /// it was added.
    pub fn push(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        if name.is_empty() {
            return false;
        }
        self.names.insert(name)
    }

    /// Check whether `name` is present.
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Number of names.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Check whether the list holds no names.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Names in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Consume the list into its names, in first-seen order.
    pub fn into_vec(self) -> Vec<String> {
        self.names.into_iter().collect()
    }
}

impl IntoIterator for NameList {
    type Item = String;
    type IntoIter = indexmap::set::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.names.into_iter()
    }
}

impl<S: Into<String>> FromIterator<S> for NameList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut list = NameList::new();
        for name in iter {
            list.push(name);
        }
        list
    }
}

/// Names from an `ls` command, with the reason reading stopped.
#[derive(Debug, Clone)]
pub struct Listing {
    pub names: NameList,
    pub state: ReadState,
}

impl Listing {
    /// Whether the listing was cut short by the buffer limit. Trailing
    /// entries may be missing.
    pub fn is_truncated(&self) -> bool {
        self.state.is_truncated()
    }
}

/// Last non-empty dot-separated segment of a token.
///
/// `com.foo.BarService` gives `BarService`, `sayHello` gives itself, a
/// trailing dot is ignored and a token of only dots gives nothing.
pub fn short_name(token: &str) -> Option<&str> {
    token.rsplit('.').find(|segment| !segment.is_empty())
}

/// Split `block` on whitespace and add each token's short name to `names`.
pub fn extract_names(block: &str, names: &mut NameList) {
    for token in block.split_whitespace() {
        if let Some(name) = short_name(token) {
            if names.push(name) {
                debug!("found name: {}", name);
            }
        }
    }
}

/// Incremental name extractor fed with response segments.
#[derive(Debug, Default)]
pub struct NameCollector {
    carry: BytesMut,
    names: NameList,
}

impl NameCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a segment. Everything up to and including the last whitespace is
    /// tokenized now; the remainder waits for the next segment.
    pub fn feed(&mut self, segment: &[u8]) {
        self.carry.extend_from_slice(segment);
        if let Some(last) = self.carry.iter().rposition(u8::is_ascii_whitespace) {
            let complete = self.carry.split_to(last + 1);
            extract_names(&String::from_utf8_lossy(&complete), &mut self.names);
        }
    }

    /// Bytes waiting for a separator.
    pub fn pending(&self) -> &[u8] {
        &self.carry
    }

    /// Names extracted so far.
    pub fn names(&self) -> &NameList {
        &self.names
    }

    /// Tokenize whatever is left and return the names.
    pub fn finish(mut self) -> NameList {
        if !self.carry.is_empty() {
            extract_names(&String::from_utf8_lossy(&self.carry), &mut self.names);
        }
        self.names
    }
}
