//! JSON form of attribute records
//!
//! A record is a JSON object keyed by attribute name. A missing key is
//! absent, `null` is null, a string is a scalar and an array of strings is a
//! set. The attribute declaration decides which shapes are accepted, so a
//! `null` becomes a null scalar or a null set as declared.

use crate::errors::{ReconcileError, Result};
use crate::record::AttributeRecord;
use crate::schema::{AttrKind, ObjectKind};
use crate::value::{AttributeValue, Value};
use reconcile_core_types::Sensitive;
use serde_json::{Map, Value as Json};

/// Decode a record of `kind` from a JSON object
///
/// # Errors
///
/// - `InvalidRecord` if the document is not an object or a set holds a non-string
/// - `UnknownAttribute` for an undeclared key
/// - `AttributeKindMismatch` for a string given to a set or an array to a scalar
pub fn record_from_json(kind: &ObjectKind, json: &Json) -> Result<AttributeRecord> {
    let object = json.as_object().ok_or_else(|| ReconcileError::InvalidRecord {
        reason: format!("{} record must be a JSON object", kind.name()),
    })?;

    let mut record = AttributeRecord::new();
    for (name, raw) in object {
        let decl = kind
            .attribute(name)
            .ok_or_else(|| ReconcileError::UnknownAttribute {
                kind: kind.name().to_string(),
                attribute: name.clone(),
            })?;
        let mismatch = || ReconcileError::AttributeKindMismatch {
            kind: kind.name().to_string(),
            attribute: name.clone(),
            expected: decl.kind.to_string(),
        };

        let value = match (decl.kind, raw) {
            (AttrKind::Scalar, Json::Null) => AttributeValue::null_scalar(),
            (AttrKind::Scalar, Json::String(s)) => AttributeValue::scalar(s.clone()),
            (AttrKind::Set, Json::Null) => AttributeValue::Set(Value::Null),
            (AttrKind::Set, Json::Array(items)) => {
                let elements = items
                    .iter()
                    .map(|item| {
                        item.as_str()
                            .map(str::to_string)
                            .ok_or_else(|| ReconcileError::InvalidRecord {
                                reason: format!(
                                    "set attribute '{}' must only hold strings, found {}",
                                    name, item
                                ),
                            })
                    })
                    .collect::<Result<Vec<_>>>()?;
                AttributeValue::set(elements)
            }
            _ => return Err(mismatch()),
        };
        record = record.with(name.clone(), value);
    }
    Ok(record)
}

/// Decode a record of `kind` from JSON text
///
/// # Errors
///
/// `Serialization` if the text is not JSON, otherwise see [`record_from_json`].
pub fn record_from_str(kind: &ObjectKind, text: &str) -> Result<AttributeRecord> {
    let json: Json = serde_json::from_str(text)?;
    record_from_json(kind, &json)
}

/// Encode a record as a JSON object in declaration order
///
/// Absent and unknown values are omitted.
pub fn record_to_json(kind: &ObjectKind, record: &AttributeRecord) -> Json {
    encode(kind, record, false)
}

/// Like [`record_to_json`], with values of sensitive attributes redacted
pub fn record_to_json_redacted(kind: &ObjectKind, record: &AttributeRecord) -> Json {
    encode(kind, record, true)
}

fn encode(kind: &ObjectKind, record: &AttributeRecord, redact: bool) -> Json {
    let mut object = Map::new();
    for decl in kind.attributes() {
        let Some(value) = record.get(&decl.name) else {
            continue;
        };
        if !value.is_known() {
            continue;
        }
        let json = if redact && decl.sensitive && !value.is_null() {
            Json::String(Sensitive::new(value).to_string())
        } else {
            value_to_json(value)
        };
        object.insert(decl.name.clone(), json);
    }
    Json::Object(object)
}

fn value_to_json(value: &AttributeValue) -> Json {
    match value {
        AttributeValue::Scalar(Value::Present(s)) => Json::String(s.clone()),
        AttributeValue::Set(Value::Present(set)) => {
            Json::Array(set.iter().cloned().map(Json::String).collect())
        }
        _ => Json::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::AttributeDecl;
    use reconcile_core_types::sensitive::REDACTED;
    use serde_json::json;

    fn kind() -> ObjectKind {
        ObjectKind::builder("extension")
            .attribute(AttributeDecl::scalar("description"))
            .attribute(AttributeDecl::set("arguments").sensitive())
            .attribute(AttributeDecl::set("tags"))
            .build()
    }

    #[test]
    fn test_decode_shapes() {
        let kind = kind();
        let record = record_from_json(
            &kind,
            &json!({"description": null, "tags": ["b", "a", "a"], "arguments": null}),
        )
        .unwrap();

        assert_eq!(record.get("description"), Some(&AttributeValue::null_scalar()));
        assert_eq!(record.get("tags"), Some(&AttributeValue::set(["a", "b"])));
        assert_eq!(record.get("arguments"), Some(&AttributeValue::Set(Value::Null)));
    }

    #[test]
    fn test_decode_missing_key_is_absent() {
        let kind = kind();
        let record = record_from_json(&kind, &json!({})).unwrap();
        assert!(record.is_absent("description"));
    }

    #[test]
    fn test_decode_rejects_bad_shapes() {
        let kind = kind();
        assert!(matches!(
            record_from_json(&kind, &json!({"tags": "a"})),
            Err(ReconcileError::AttributeKindMismatch { .. })
        ));
        assert!(matches!(
            record_from_json(&kind, &json!({"tags": [1]})),
            Err(ReconcileError::InvalidRecord { .. })
        ));
        assert!(matches!(
            record_from_json(&kind, &json!({"colour": "red"})),
            Err(ReconcileError::UnknownAttribute { .. })
        ));
        assert!(matches!(
            record_from_json(&kind, &json!(["not", "an", "object"])),
            Err(ReconcileError::InvalidRecord { .. })
        ));
    }

    #[test]
    fn test_decode_invalid_text() {
        let kind = kind();
        assert!(matches!(
            record_from_str(&kind, "{not json"),
            Err(ReconcileError::Serialization { .. })
        ));
    }

    #[test]
    fn test_encode_omits_unknown_and_redacts_on_request() {
        let kind = kind();
        let record = AttributeRecord::new()
            .with("description", AttributeValue::unknown_scalar())
            .with("arguments", AttributeValue::set(["secret=1"]))
            .with("tags", AttributeValue::empty_set());

        assert_eq!(
            record_to_json(&kind, &record),
            json!({"arguments": ["secret=1"], "tags": []})
        );
        assert_eq!(
            record_to_json_redacted(&kind, &record),
            json!({"arguments": REDACTED, "tags": []})
        );
    }
}
