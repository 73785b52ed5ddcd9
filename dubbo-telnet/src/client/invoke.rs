//! Post-processing of `invoke` output.
//!
//! The console answers an invoke with the returned value on one line and a
//! timing line after it:
//!
//! ```text
//! [1,2,3]
//! elapsed: 15 ms.
//! ```

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::error::ParseError;

const ELAPSED_MARKER: &str = "elapsed:";

static ELAPSED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"elapsed:([^\r\n]*?)ms").expect("valid elapsed pattern"));

/// Outcome of an `invoke` command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvokeResult {
    /// The value returned by the method, verbatim (usually JSON, not
    /// validated here).
    pub result: String,

    /// Execution time reported by the console, 0 when absent.
    pub elapsed_millis: u64,

    /// Whether the console reported a timing line. Error replies such as
    /// `No such method` come without one.
    pub valid: bool,

    /// Output was cut at the buffer ceiling before the prompt arrived.
    pub truncated: bool,
}

/// Split raw invoke output into the returned value and elapsed time.
///
/// A timing marker with a missing or non-numeric value is an error rather
/// than a silent 0.
pub fn parse_invoke_result(raw: &str) -> Result<InvokeResult, ParseError> {
    let text = raw.trim();

    let Some((value, rest)) = text.split_once('\n') else {
        return Ok(InvokeResult {
            result: text.to_string(),
            elapsed_millis: 0,
            valid: false,
            truncated: false,
        });
    };

    let value = value.strip_suffix('\r').unwrap_or(value);
    let elapsed = parse_elapsed(rest)?;

    Ok(InvokeResult {
        result: value.to_string(),
        elapsed_millis: elapsed.unwrap_or(0),
        valid: elapsed.is_some(),
        truncated: false,
    })
}

/// Build a result from output cut at the buffer ceiling.
///
/// Whatever is left of the timing line is ignored, so this never fails. The
/// value is the first line, or everything read if no line break arrived.
pub fn parse_truncated_invoke_result(raw: &str) -> InvokeResult {
    let text = raw.trim();
    let value = text.split_once('\n').map_or(text, |(value, _)| value);

    InvokeResult {
        result: value.strip_suffix('\r').unwrap_or(value).to_string(),
        elapsed_millis: 0,
        valid: false,
        truncated: true,
    }
}

fn parse_elapsed(text: &str) -> Result<Option<u64>, ParseError> {
    let Some(line) = text.lines().find(|line| line.contains(ELAPSED_MARKER)) else {
        return Ok(None);
    };

    let value = ELAPSED
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| ParseError::MissingElapsed {
            line: line.trim().to_string(),
        })?;

    value
        .parse::<u64>()
        .map(Some)
        .map_err(|source| ParseError::InvalidElapsed {
            value: value.to_string(),
            source,
        })
}
