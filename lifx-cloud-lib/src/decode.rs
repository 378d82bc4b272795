//! Response decoding.
//!
//! The API answers every request with either a single JSON object or an
//! array of objects. Decoding normalizes the root into a batch, then runs an
//! explicit schema validator over each element. Validation is all-or-nothing:
//! the first invalid element rejects the whole batch, so callers never see a
//! partial record list.

use serde_json::Value;

use crate::error::DecodeError;

/// A record type that can be validated and constructed from one batch
/// element.
///
/// Implementations validate every required field before constructing the
/// record, so a returned value is always fully populated.
pub trait ResponseRecord: Sized {
    fn from_json(value: &Value) -> Result<Self, DecodeError>;
}

/// Decodes raw response bytes into a batch of records.
///
/// A root object is treated as a one-element batch and a root array is used
/// directly. Any other root shape, including an explicit empty array, yields
/// an empty batch with no error; the server uses those shapes for "nothing
/// matched".
pub fn decode_batch<T: ResponseRecord>(bytes: &[u8]) -> Result<Vec<T>, DecodeError> {
    let root: Value =
        serde_json::from_slice(bytes).map_err(|e| DecodeError::Parse(e.to_string()))?;

    let batch: &[Value] = match &root {
        Value::Object(_) => std::slice::from_ref(&root),
        Value::Array(elements) => elements,
        _ => &[],
    };

    // Collecting into Result aborts on the first invalid element.
    batch.iter().map(T::from_json).collect()
}

pub(crate) fn required_str<'a>(value: &'a Value, key: &str) -> Result<&'a str, DecodeError> {
    value
        .get(key)
        .and_then(Value::as_str)
        .ok_or_else(DecodeError::missing_required)
}

pub(crate) fn required_f64(value: &Value, key: &str) -> Result<f64, DecodeError> {
    value
        .get(key)
        .and_then(Value::as_f64)
        .ok_or_else(DecodeError::missing_required)
}

pub(crate) fn required_i64(value: &Value, key: &str) -> Result<i64, DecodeError> {
    value
        .get(key)
        .and_then(Value::as_i64)
        .ok_or_else(DecodeError::missing_required)
}

pub(crate) fn required_bool(value: &Value, key: &str) -> Result<bool, DecodeError> {
    value
        .get(key)
        .and_then(Value::as_bool)
        .ok_or_else(DecodeError::missing_required)
}

pub(crate) fn required_object<'a>(value: &'a Value, key: &str) -> Result<&'a Value, DecodeError> {
    value
        .get(key)
        .filter(|v| v.is_object())
        .ok_or_else(DecodeError::missing_required)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CommandResult, CommandStatus, Light};

    fn lamp_json(id: &str) -> Value {
        serde_json::json!({
            "id": id,
            "power": "on",
            "brightness": 0.5,
            "color": {"hue": 120, "saturation": 1.0, "kelvin": 3500},
            "label": "Lamp",
            "connected": true
        })
    }

    #[test]
    fn bare_object_decodes_as_one_element_batch() {
        let bytes = lamp_json("abcd").to_string().into_bytes();
        let lights: Vec<Light> = decode_batch(&bytes).unwrap();

        assert_eq!(lights.len(), 1);
        let light = &lights[0];
        assert_eq!(light.id, "abcd");
        assert!(light.power);
        assert_eq!(light.brightness, 0.5);
        assert_eq!(light.color.hue, 120.0);
        assert_eq!(light.color.saturation, 1.0);
        assert_eq!(light.color.kelvin, 3500);
        assert_eq!(light.label, "Lamp");
        assert!(light.connected);
    }

    #[test]
    fn array_decodes_in_order() {
        let mut second = lamp_json("efgh");
        second["power"] = Value::String("off".to_string());
        let bytes = Value::Array(vec![lamp_json("abcd"), second])
            .to_string()
            .into_bytes();

        let lights: Vec<Light> = decode_batch(&bytes).unwrap();
        assert_eq!(lights.len(), 2);
        assert_eq!(lights[0].id, "abcd");
        assert!(lights[0].power);
        assert_eq!(lights[1].id, "efgh");
        assert!(!lights[1].power);
    }

    #[test]
    fn invalid_last_element_rejects_whole_batch() {
        let mut broken = lamp_json("efgh");
        broken.as_object_mut().unwrap().remove("label");
        let bytes = Value::Array(vec![lamp_json("abcd"), broken])
            .to_string()
            .into_bytes();

        let error = decode_batch::<Light>(&bytes).unwrap_err();
        assert_eq!(
            error,
            DecodeError::Schema("JSON object is missing required properties".to_string())
        );
    }

    #[test]
    fn mistyped_field_is_a_schema_error() {
        let mut broken = lamp_json("abcd");
        broken["brightness"] = Value::String("bright".to_string());
        let bytes = broken.to_string().into_bytes();

        assert!(matches!(
            decode_batch::<Light>(&bytes),
            Err(DecodeError::Schema(_))
        ));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(
            decode_batch::<Light>(b"{not json"),
            Err(DecodeError::Parse(_))
        ));
    }

    #[test]
    fn empty_array_is_an_empty_batch() {
        let lights: Vec<Light> = decode_batch(b"[]").unwrap();
        assert!(lights.is_empty());
    }

    #[test]
    fn non_object_root_is_an_empty_batch() {
        let lights: Vec<Light> = decode_batch(b"\"all\"").unwrap();
        assert!(lights.is_empty());

        let lights: Vec<Light> = decode_batch(b"42").unwrap();
        assert!(lights.is_empty());
    }

    #[test]
    fn results_decode_with_lenient_status() {
        let bytes = br#"[
            {"id": "a", "status": "ok"},
            {"id": "b", "status": "timed_out"},
            {"id": "c", "status": "offline"},
            {"id": "d", "status": "exploded"},
            {"id": "e"}
        ]"#;

        let results: Vec<CommandResult> = decode_batch(bytes).unwrap();
        let statuses: Vec<CommandStatus> = results.iter().map(|r| r.status).collect();
        assert_eq!(
            statuses,
            vec![
                CommandStatus::Ok,
                CommandStatus::TimedOut,
                CommandStatus::Offline,
                CommandStatus::Unknown,
                CommandStatus::Unknown,
            ]
        );
    }

    #[test]
    fn result_without_id_is_a_schema_error() {
        assert!(matches!(
            decode_batch::<CommandResult>(br#"{"status": "ok"}"#),
            Err(DecodeError::Schema(_))
        ));
    }
}
