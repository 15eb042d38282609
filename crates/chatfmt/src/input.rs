//! Input reading and size bounding.
//!
//! The renderer runs in linear time but still allocates proportionally to
//! its input, so the CLI caps what it hands over.

use std::io::Read;
use std::path::Path;

use chatfmt_config::{InputConfig, OversizePolicy};

use crate::error::CliError;

/// Read a whole message from `path`, or from stdin when `path` is `None`.
pub(crate) fn read_input(path: Option<&Path>) -> Result<String, CliError> {
    match path {
        Some(path) => Ok(std::fs::read_to_string(path)?),
        None => {
            let mut text = String::new();
            std::io::stdin().lock().read_to_string(&mut text)?;
            Ok(text)
        }
    }
}

/// Apply the configured size limit to `text`.
///
/// Under [`OversizePolicy::Truncate`] the result is cut at the last
/// character boundary that fits, and a warning naming `source` is logged.
pub(crate) fn bound_input<'a>(
    text: &'a str,
    limits: &InputConfig,
    source: &str,
) -> Result<&'a str, CliError> {
    let max = limits.max_bytes;
    if text.len() <= max {
        return Ok(text);
    }

    match limits.oversize {
        OversizePolicy::Reject => Err(CliError::InputTooLarge {
            len: text.len(),
            max,
        }),
        OversizePolicy::Truncate => {
            let mut end = max;
            while !text.is_char_boundary(end) {
                end -= 1;
            }
            tracing::warn!(
                source,
                input_bytes = text.len(),
                kept_bytes = end,
                "Input truncated"
            );
            Ok(&text[..end])
        }
    }
}
