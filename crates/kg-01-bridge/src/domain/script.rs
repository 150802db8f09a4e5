//! Response script evaluation.
//!
//! The remote side answers with executable content of the form
//! `callbackName({...});`, sometimes prefixed with `/**/`. We never execute
//! anything: the body is matched against that one shape and the embedded JSON
//! is handed to the named handler.

use serde_json::Value;

use crate::domain::error::CallFailure;
use crate::domain::pending::HandlerRegistry;

/// A parsed response script.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptResponse {
    /// Handler the script invokes
    pub callback: String,
    /// The single argument passed to it
    pub payload: Value,
}

impl ScriptResponse {
    /// Parse a response body.
    ///
    /// Accepts optional surrounding whitespace, an optional `/**/` prefix and
    /// an optional trailing `;`. Anything else is a transport error.
    pub fn parse(body: &str) -> Result<Self, CallFailure> {
        let mut text = body.trim();
        if let Some(rest) = text.strip_prefix("/**/") {
            text = rest.trim_start();
        }
        if let Some(rest) = text.strip_suffix(';') {
            text = rest.trim_end();
        }

        let open = text.find('(').ok_or_else(|| malformed("no call expression"))?;
        let inner = text[open + 1..]
            .strip_suffix(')')
            .ok_or_else(|| malformed("call is not closed"))?;

        let callback = text[..open].trim();
        if !is_identifier(callback) {
            return Err(malformed("callee is not an identifier"));
        }

        let payload = serde_json::from_str(inner)
            .map_err(|e| malformed(&format!("argument is not JSON: {e}")))?;

        Ok(Self {
            callback: callback.to_string(),
            payload,
        })
    }

    /// Render a script body the way the remote side does.
    pub fn render(callback: &str, payload: &Value) -> String {
        format!("/**/{callback}({payload});")
    }

    /// Parse `body` and invoke the handler it names.
    ///
    /// Returns whether a live handler accepted the payload. A well-formed
    /// script naming a missing handler still counts as evaluated.
    pub fn evaluate(body: &str, registry: &HandlerRegistry) -> Result<bool, CallFailure> {
        let script = Self::parse(body)?;
        Ok(registry.invoke(&script.callback, script.payload))
    }
}

fn malformed(detail: &str) -> CallFailure {
    CallFailure::Transport(format!("malformed response script: {detail}"))
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}
