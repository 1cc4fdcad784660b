//! Canonical JSON bytes: the single serialization-for-hashing implementation.
//!
//! All digests route through this module so that two structurally equal
//! values always hash identically.
//!
//! # Canonicalization rules
//!
//! 1. Object keys are sorted lexicographically (byte order).
//! 2. Compact form, no whitespace: `{"a":1,"b":2}`.
//! 3. Strings are escaped per RFC 8259 §7; control characters as `\u00XX`.
//! 4. Numbers must be integers (`i64` or `u64`). Floats are rejected so that
//!    formatting can never drift between platforms.
//! 5. `null`, `true`, `false` are written literally.

use std::io::Write;

use serde::Serialize;
use serde_json::Value;

/// Error type for canonical JSON serialization.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CanonError {
    /// A JSON number was not an integer.
    #[error("non-integer number in canonical JSON: {raw}")]
    NonIntegerNumber { raw: String },
    /// The value could not be converted to a JSON tree.
    #[error("value is not representable as JSON: {detail}")]
    Unrepresentable { detail: String },
}

/// Produce canonical JSON bytes from a `serde_json::Value`.
///
/// # Errors
///
/// Returns [`CanonError::NonIntegerNumber`] if any number in the tree is
/// not representable as `i64` or `u64`.
pub fn canonical_json_bytes(value: &Value) -> Result<Vec<u8>, CanonError> {
    let mut writer = CanonicalWriter::default();
    writer.value(value)?;
    Ok(writer.buf)
}

/// Serialize any `Serialize` value through the canonical writer.
///
/// # Errors
///
/// Returns [`CanonError::Unrepresentable`] if `serde_json` rejects the value
/// (e.g. a map with non-string keys), or [`CanonError::NonIntegerNumber`]
/// for floats.
pub fn canonical_json_bytes_of<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, CanonError> {
    let tree = serde_json::to_value(value).map_err(|e| CanonError::Unrepresentable {
        detail: e.to_string(),
    })?;
    canonical_json_bytes(&tree)
}

#[derive(Default)]
struct CanonicalWriter {
    buf: Vec<u8>,
}

impl CanonicalWriter {
    fn value(&mut self, value: &Value) -> Result<(), CanonError> {
        match value {
            Value::Null => self.buf.extend_from_slice(b"null"),
            Value::Bool(true) => self.buf.extend_from_slice(b"true"),
            Value::Bool(false) => self.buf.extend_from_slice(b"false"),
            Value::Number(n) => self.number(n)?,
            Value::String(s) => self.string(s),
            Value::Array(items) => {
                self.buf.push(b'[');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        self.buf.push(b',');
                    }
                    self.value(item)?;
                }
                self.buf.push(b']');
            }
            Value::Object(map) => {
                let mut entries: Vec<(&String, &Value)> = map.iter().collect();
                entries.sort_by(|a, b| a.0.as_bytes().cmp(b.0.as_bytes()));

                self.buf.push(b'{');
                for (i, (key, item)) in entries.into_iter().enumerate() {
                    if i > 0 {
                        self.buf.push(b',');
                    }
                    self.string(key);
                    self.buf.push(b':');
                    self.value(item)?;
                }
                self.buf.push(b'}');
            }
        }
        Ok(())
    }

    fn number(&mut self, n: &serde_json::Number) -> Result<(), CanonError> {
        // Writes into a Vec cannot fail.
        if let Some(i) = n.as_i64() {
            let _ = write!(self.buf, "{i}");
        } else if let Some(u) = n.as_u64() {
            let _ = write!(self.buf, "{u}");
        } else {
            return Err(CanonError::NonIntegerNumber { raw: n.to_string() });
        }
        Ok(())
    }

    fn string(&mut self, s: &str) {
        self.buf.push(b'"');
        for ch in s.chars() {
            match ch {
                '"' => self.buf.extend_from_slice(b"\\\""),
                '\\' => self.buf.extend_from_slice(b"\\\\"),
                '\n' => self.buf.extend_from_slice(b"\\n"),
                '\r' => self.buf.extend_from_slice(b"\\r"),
                '\t' => self.buf.extend_from_slice(b"\\t"),
                c if c < '\u{0020}' => {
                    let _ = write!(self.buf, "\\u{:04x}", u32::from(c));
                }
                c => {
                    let mut utf8 = [0u8; 4];
                    self.buf
                        .extend_from_slice(c.encode_utf8(&mut utf8).as_bytes());
                }
            }
        }
        self.buf.push(b'"');
    }
}
