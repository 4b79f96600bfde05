//! Canonical JSON encoding for deterministic serialization.
//!
//! This module implements RFC 8785-style canonical JSON:
//! - Object keys sorted lexicographically by Unicode code point
//! - No insignificant whitespace
//! - Standard JSON literal rules for primitives (including key quoting)
//! - Absent fields are dropped before encoding; explicit `null` is kept
//!
//! The canonical encoding is critical: it ensures that the same receipt
//! produces identical bytes (and thus identical hashes and signatures)
//! across every component that hashes, signs, or verifies.
//!
//! **CRITICAL**: This encoding is FROZEN. Changes break all existing
//! signatures and chain hashes.

use serde_json::Value;

use crate::crypto::Sha256Hash;

/// Encode a JSON value to its canonical string form.
///
/// Total and deterministic for any JSON tree: two structurally equal values
/// always produce byte-identical output regardless of construction order.
pub fn canonical_json(value: &Value) -> String {
    let mut out = String::new();
    write_value(&mut out, value);
    out
}

/// Canonical form as UTF-8 bytes (the hashing/signing input).
pub fn canonical_bytes(value: &Value) -> Vec<u8> {
    canonical_json(value).into_bytes()
}

/// SHA-256 of the canonical form, as lowercase hex.
///
/// This is the content-address function used for receipt ids, chain hashes,
/// and privacy-preserving prompt/response hashes.
pub fn hash_canonical(value: &Value) -> String {
    Sha256Hash::hash(canonical_json(value).as_bytes()).to_hex()
}

fn write_value(out: &mut String, value: &Value) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(true) => out.push_str("true"),
        Value::Bool(false) => out.push_str("false"),
        Value::Number(n) => out.push_str(&n.to_string()),
        Value::String(s) => write_string(out, s),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_value(out, item);
            }
            out.push(']');
        }
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            out.push('{');
            for (i, key) in keys.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_string(out, key);
                out.push(':');
                // Key came out of the map above.
                if let Some(v) = map.get(key.as_str()) {
                    write_value(out, v);
                }
            }
            out.push('}');
        }
    }
}

/// Write a JSON string literal with standard escaping.
///
/// Short escapes for the usual control characters, `\u00XX` for the rest,
/// raw UTF-8 for everything above ASCII control range.
fn write_string(out: &mut String, s: &str) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0c}' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => {
                out.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => out.push(c),
        }
    }
    out.push('"');
}
