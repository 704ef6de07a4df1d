//! `serde_json` codec adapter.
//!
//! `serde_json` reports failures as a category plus a position. This adapter
//! maps them onto [`JsonFailureKind`]s and rebuilds the navigation path to the
//! failing element by scanning the body up to the reported position.

use faultline_domain::{BEAN_ERROR_PREFIXES, CLIENT_IO_PREFIX, JsonFailure, JsonFailureKind, PathReference};
use faultline_ports::JsonCodecPort;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::error::Category;

/// JSON codec backed by `serde_json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SerdeJsonCodec;

impl SerdeJsonCodec {
    /// Create a codec.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl JsonCodecPort for SerdeJsonCodec {
    fn decode<T: DeserializeOwned>(&self, body: &[u8]) -> Result<T, JsonFailure> {
        serde_json::from_slice(body).map_err(|error| decode_failure(&error, body))
    }

    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<serde_json::Value, JsonFailure> {
        serde_json::to_value(value).map_err(|error| JsonFailure::generation(bare_message(&error)))
    }
}

fn decode_failure(error: &serde_json::Error, body: &[u8]) -> JsonFailure {
    let message = bare_message(error);
    let kind = match error.classify() {
        Category::Io => {
            return JsonFailure::new(JsonFailureKind::Io, format!("{CLIENT_IO_PREFIX}: {message}"));
        },
        Category::Syntax | Category::Eof => JsonFailureKind::Parse,
        Category::Data => data_failure_kind(&message),
    };
    JsonFailure::new(kind, message).with_path(reference_chain(body, error.line(), error.column()))
}

/// Kind for a data error, judged by the message `serde` produced.
fn data_failure_kind(message: &str) -> JsonFailureKind {
    if BEAN_ERROR_PREFIXES
        .iter()
        .any(|prefix| message.starts_with(prefix))
    {
        return JsonFailureKind::InvalidDefinition;
    }
    if ["unknown field", "missing field", "duplicate field"]
        .iter()
        .any(|prefix| message.starts_with(prefix))
    {
        return JsonFailureKind::PropertyBinding;
    }
    if message.starts_with("invalid type") || message.starts_with("invalid length") {
        return JsonFailureKind::MismatchedInput;
    }
    // Out-of-range values, unknown variants and custom deserializer errors.
    JsonFailureKind::InvalidFormat
}

/// Error message without the trailing position suffix.
fn bare_message(error: &serde_json::Error) -> String {
    let rendered = error.to_string();
    if error.line() == 0 {
        return rendered;
    }
    let suffix = format!(" at line {} column {}", error.line(), error.column());
    rendered
        .strip_suffix(&suffix)
        .map_or_else(|| rendered.clone(), str::to_owned)
}

enum Frame {
    Object { key: Option<String>, in_value: bool },
    Array { index: usize },
}

/// Path to the element being read at `line`/`column`.
fn reference_chain(body: &[u8], line: usize, column: usize) -> Vec<PathReference> {
    let Some(end) = byte_offset(body, line, column) else {
        return Vec::new();
    };
    let mut frames = Vec::new();
    let mut bytes = body.iter().take(end).copied();

    while let Some(byte) = bytes.next() {
        match byte {
            b'{' => frames.push(Frame::Object {
                key: None,
                in_value: false,
            }),
            b'[' => frames.push(Frame::Array { index: 0 }),
            b'}' | b']' => {
                frames.pop();
            },
            b':' => {
                if let Some(Frame::Object { in_value, .. }) = frames.last_mut() {
                    *in_value = true;
                }
            },
            b',' => match frames.last_mut() {
                Some(Frame::Object { key, in_value }) => {
                    *key = None;
                    *in_value = false;
                },
                Some(Frame::Array { index }) => *index += 1,
                None => {},
            },
            b'"' => {
                let text = read_string(&mut bytes);
                if let Some(Frame::Object {
                    key,
                    in_value: false,
                }) = frames.last_mut()
                {
                    *key = Some(text);
                }
            },
            _ => {},
        }
    }

    frames
        .into_iter()
        .filter_map(|frame| match frame {
            Frame::Object { key, .. } => key.map(PathReference::Field),
            Frame::Array { index } => Some(PathReference::Index(index)),
        })
        .collect()
}

fn read_string(bytes: &mut impl Iterator<Item = u8>) -> String {
    let mut raw = Vec::new();
    while let Some(byte) = bytes.next() {
        match byte {
            b'"' => break,
            b'\\' => raw.extend(bytes.next()),
            other => raw.push(other),
        }
    }
    String::from_utf8_lossy(&raw).into_owned()
}

fn byte_offset(body: &[u8], line: usize, column: usize) -> Option<usize> {
    if line == 0 {
        return None;
    }
    let mut current = 1;
    let mut start = 0;
    for (position, byte) in body.iter().enumerate() {
        if current == line {
            break;
        }
        if *byte == b'\n' {
            current += 1;
            start = position + 1;
        }
    }
    (current == line).then(|| (start + column).min(body.len()))
}
