//! Storage notification parsing.

use crate::error::{ReactorError, Result};
use percent_encoding::percent_decode_str;
use serde_json::Value;

/// Bucket and decoded key of the object that fired the event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectRef {
    pub bucket: String,
    pub key: String,
}

/// Reads `Records[0].s3.bucket.name` and `Records[0].s3.object.key`.
///
/// The first absent segment is reported as the missing field, e.g.
/// `Records[0].s3.object.key`.
pub fn parse_event(event: &Value) -> Result<ObjectRef> {
    let record = event
        .get("Records")
        .ok_or_else(|| missing("Records"))?
        .get(0)
        .ok_or_else(|| missing("Records[0]"))?;
    let s3 = record.get("s3").ok_or_else(|| missing("Records[0].s3"))?;

    let bucket = string_at(s3, &["bucket", "name"], "Records[0].s3.bucket.name")?;
    let raw_key = string_at(s3, &["object", "key"], "Records[0].s3.object.key")?;

    Ok(ObjectRef {
        bucket: bucket.to_string(),
        key: decode_key(raw_key),
    })
}

fn string_at<'a>(value: &'a Value, path: &[&str], field: &str) -> Result<&'a str> {
    path.iter()
        .try_fold(value, |v, segment| v.get(*segment))
        .and_then(Value::as_str)
        .ok_or_else(|| missing(field))
}

fn missing(field: &str) -> ReactorError {
    ReactorError::MissingField(field.to_string())
}

/// Event keys are form-encoded: `+` is a space, `%XX` an escaped byte.
pub fn decode_key(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    percent_decode_str(&spaced).decode_utf8_lossy().into_owned()
}

/// Last path segment without its extension. A leading dot is not an
/// extension separator: `.env` stays `.env`.
pub fn basename_no_ext(key: &str) -> &str {
    let base = key.rsplit('/').next().unwrap_or(key);
    match base.rfind('.') {
        Some(dot) if dot > 0 => &base[..dot],
        _ => base,
    }
}
