use crate::fields::FieldValue;

/// Normalize CEF backslash escapes that break an embedded JSON payload.
/// Only `\=` occurs in practice (CEF escapes `=` inside extension values).
pub fn unescape(raw: &str) -> String {
    raw.replace("\\=", "=")
}

/// Best-effort secondary decode for JSON-prone fields.
///
/// Decode failure is expected and never an error: the field keeps the
/// unescaped text unchanged.
pub fn decode_lenient(raw: &str) -> FieldValue {
    let cleaned = unescape(raw);
    match serde_json::from_str::<serde_json::Value>(&cleaned) {
        Ok(value) => FieldValue::Json(value),
        Err(_) => FieldValue::Text(cleaned),
    }
}
