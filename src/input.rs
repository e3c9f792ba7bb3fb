//! Input decoding and envelope normalization.

use crate::report::TransformError;
use serde_json::{Map, Value};
use tracing::debug;

/// Raw vendor API response in any of the accepted encodings.
///
/// Transforms take `impl Into<RawInput>` so callers can pass a parsed
/// value, JSON text, or raw bytes without converting first.
#[derive(Debug, Clone)]
pub enum RawInput {
    /// Already-parsed JSON value (mapping, sequence, or scalar).
    Value(Value),
    /// JSON text, or loosely-quoted literal text that can be repaired.
    Text(String),
    /// UTF-8 bytes carrying JSON text.
    Bytes(Vec<u8>),
}

impl From<Value> for RawInput {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl From<&str> for RawInput {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for RawInput {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&[u8]> for RawInput {
    fn from(bytes: &[u8]) -> Self {
        Self::Bytes(bytes.to_vec())
    }
}

impl From<Vec<u8>> for RawInput {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(bytes)
    }
}

/// Normalized payload after decoding and envelope peeling.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// JSON object.
    Mapping(Map<String, Value>),
    /// JSON array.
    Sequence(Vec<Value>),
    /// Anything else (null, bool, number, string).
    Scalar(Value),
}

impl Payload {
    fn from_value(value: Value) -> Self {
        match value {
            Value::Object(map) => Self::Mapping(map),
            Value::Array(items) => Self::Sequence(items),
            other => Self::Scalar(other),
        }
    }

    /// Look up a top-level field. Returns `None` for sequences and scalars.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Self::Mapping(map) => map.get(key),
            Self::Sequence(_) | Self::Scalar(_) => None,
        }
    }

    /// View the payload as a sequence of records.
    ///
    /// # Errors
    /// Returns [`TransformError::Shape`] when the payload is not an array.
    pub fn sequence(&self) -> Result<&[Value], TransformError> {
        match self {
            Self::Sequence(items) => Ok(items),
            Self::Mapping(_) => Err(TransformError::Shape(
                "expected a sequence, found a mapping".to_string(),
            )),
            Self::Scalar(_) => Err(TransformError::Shape(
                "expected a sequence, found a scalar".to_string(),
            )),
        }
    }

    /// Whether the payload is JSON null.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Scalar(Value::Null))
    }

    /// Whether the payload carries a vendor `errors` key.
    pub fn has_errors(&self) -> bool {
        matches!(self, Self::Mapping(map) if map.contains_key("errors"))
    }
}

/// Decode a raw input and peel the given envelope keys, in order.
///
/// Envelope peeling is shallow: for each key in `envelope`, if the current
/// mapping contains it, descend into that value; absence is normal and
/// never errors. Once the current value is no longer a mapping, remaining
/// keys cannot match and are skipped.
///
/// # Errors
/// Returns [`TransformError::UnsupportedInputType`] for non-UTF-8 bytes and
/// [`TransformError::InvalidInputFormat`] when text decodes as neither
/// strict JSON nor repaired loose-literal JSON.
pub fn normalize(raw: RawInput, envelope: &[&str]) -> Result<Payload, TransformError> {
    let value = decode(raw)?;
    Ok(Payload::from_value(peel_envelope(value, envelope)))
}

/// Decode the raw input into a JSON value.
fn decode(raw: RawInput) -> Result<Value, TransformError> {
    match raw {
        RawInput::Value(value) => Ok(value),
        RawInput::Text(text) => decode_text(&text),
        RawInput::Bytes(bytes) => {
            let text = std::str::from_utf8(&bytes)
                .map_err(|_| TransformError::UnsupportedInputType("non-UTF-8 byte input"))?;
            decode_text(text)
        }
    }
}

/// Decode text as strict JSON, falling back to loose-literal repair.
fn decode_text(text: &str) -> Result<Value, TransformError> {
    if let Ok(value) = serde_json::from_str(text) {
        return Ok(value);
    }

    let repaired = repair_loose_json(text);
    match serde_json::from_str(&repaired) {
        Ok(value) => {
            debug!("decoded input after loose-literal repair");
            Ok(value)
        }
        Err(e) => Err(TransformError::InvalidInputFormat(e.to_string())),
    }
}

/// Peel envelope keys in order, tolerating absence.
fn peel_envelope(mut value: Value, envelope: &[&str]) -> Value {
    for key in envelope {
        if let Value::Object(map) = &mut value {
            if let Some(inner) = map.remove(*key) {
                value = inner;
            }
        }
    }
    value
}

/// Repair loosely-quoted (Python-literal-style) text into valid JSON.
///
/// Rewrites single-quoted strings as double-quoted (escaping embedded
/// double quotes) and the bare words `True`/`False`/`None` into their JSON
/// spellings. Content inside string literals is otherwise left untouched.
pub fn repair_loose_json(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let chars: Vec<char> = text.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            quote @ ('\'' | '"') => {
                out.push('"');
                i += 1;
                while i < chars.len() {
                    let c = chars[i];
                    if c == '\\' && i + 1 < chars.len() {
                        let next = chars[i + 1];
                        if next == '\'' {
                            // An escaped single quote needs no escape in JSON.
                            out.push('\'');
                        } else {
                            out.push('\\');
                            out.push(next);
                        }
                        i += 2;
                        continue;
                    }
                    if c == quote {
                        break;
                    }
                    if c == '"' {
                        out.push('\\');
                    }
                    out.push(c);
                    i += 1;
                }
                out.push('"');
            }
            c if c.is_ascii_alphabetic() => {
                let start = i;
                while i < chars.len() && chars[i].is_ascii_alphanumeric() {
                    i += 1;
                }
                let word: String = chars[start..i].iter().collect();
                match word.as_str() {
                    "True" => out.push_str("true"),
                    "False" => out.push_str("false"),
                    "None" => out.push_str("null"),
                    other => out.push_str(other),
                }
                continue;
            }
            c => out.push(c),
        }
        i += 1;
    }

    out
}
