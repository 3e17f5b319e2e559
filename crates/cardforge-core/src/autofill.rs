//! AI-assisted form autofill.
//!
//! The network call itself lives behind [`AutofillClient`]; this module only
//! parses what comes back.

use crate::storage::BoxFuture;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AutofillError {
    #[error("Autofill request failed: {0}")]
    Request(String),
    #[error("Autofill response is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("Autofill response must be a JSON object")]
    NotAnObject,
}

/// Sends a prompt to a text-generation service and returns the raw reply.
pub trait AutofillClient {
    fn generate<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, Result<String, AutofillError>>;
}

/// Strip an optional markdown code fence around the reply.
fn strip_code_fence(reply: &str) -> &str {
    let trimmed = reply.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string (e.g. `json`) on the opening fence line.
    let body = rest.split_once('\n').map_or("", |(_, body)| body);
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

/// Parse a reply into the JSON object to merge into the card data.
pub fn parse_reply(
    reply: &str,
) -> Result<serde_json::Map<String, serde_json::Value>, AutofillError> {
    match serde_json::from_str(strip_code_fence(reply))? {
        serde_json::Value::Object(map) => Ok(map),
        _ => Err(AutofillError::NotAnObject),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_json() {
        let map = parse_reply(r#"{"fullName": "Sunil Jayasuriya"}"#).unwrap();
        assert_eq!(map["fullName"], "Sunil Jayasuriya");
    }

    #[test]
    fn test_fenced_json() {
        let reply = "```json\n{\"nic\": \"880123456V\"}\n```\n";
        assert_eq!(parse_reply(reply).unwrap()["nic"], "880123456V");
        let bare = "```\n{\"grade\": \"II\"}\n```";
        assert_eq!(parse_reply(bare).unwrap()["grade"], "II");
    }

    #[test]
    fn test_rejects_non_objects() {
        assert!(matches!(parse_reply("[]"), Err(AutofillError::NotAnObject)));
        assert!(matches!(parse_reply("Sure! Here you go"), Err(AutofillError::InvalidJson(_))));
    }
}
