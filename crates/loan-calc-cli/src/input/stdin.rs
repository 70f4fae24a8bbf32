use serde::de::DeserializeOwned;
use std::io::{self, Read};
use tracing::debug;

/// Parameters piped on stdin, deserialized straight into the request type.
/// `None` when stdin is interactive or carries only whitespace, so the
/// caller falls back to command-line flags.
pub fn read_stdin<T: DeserializeOwned>() -> Result<Option<T>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    parse_piped(&buffer)
}

fn parse_piped<T: DeserializeOwned>(text: &str) -> Result<Option<T>, Box<dyn std::error::Error>> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    debug!(bytes = trimmed.len(), "reading loan parameters from stdin");
    let params = serde_json::from_str(trimmed)
        .map_err(|e| format!("Failed to parse piped JSON: {e}"))?;
    Ok(Some(params))
}
