//! Decoded domain records.
//!
//! Every record is an ephemeral snapshot constructed fresh per response and
//! owned solely by the caller that receives it; the client keeps nothing
//! after the completion returns.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::decode::{
    required_bool, required_f64, required_i64, required_object, required_str, ResponseRecord,
};
use crate::error::DecodeError;

/// Color as the API reports it, always embedded in a [`Light`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Color {
    /// Hue in degrees, 0–360.
    pub hue: f64,
    /// Saturation as a fraction, 0–1.
    pub saturation: f64,
    /// Color temperature in kelvin.
    pub kelvin: i64,
}

/// One device's reported state at the time of the request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Light {
    /// Opaque identifier, unique per device.
    pub id: String,
    /// Whether the light is on, derived from the wire strings `"on"`/`"off"`.
    pub power: bool,
    /// Brightness as a fraction, 0–1.
    pub brightness: f64,
    pub color: Color,
    /// Display name as configured by the owner.
    pub label: String,
    /// Whether the cloud can currently reach the device.
    pub connected: bool,
}

/// Per-device outcome of a power or color command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandResult {
    /// The device the command targeted.
    pub id: String,
    pub status: CommandStatus,
}

/// How a device answered a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandStatus {
    Ok,
    TimedOut,
    Offline,
    /// The API reported a status string this library does not recognize,
    /// or none at all.
    Unknown,
}

impl CommandStatus {
    fn from_wire(status: &str) -> Self {
        match status {
            "ok" => CommandStatus::Ok,
            "timed_out" => CommandStatus::TimedOut,
            "offline" => CommandStatus::Offline,
            _ => CommandStatus::Unknown,
        }
    }
}

impl fmt::Display for CommandStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status_str = match self {
            CommandStatus::Ok => "ok",
            CommandStatus::TimedOut => "timed_out",
            CommandStatus::Offline => "offline",
            CommandStatus::Unknown => "unknown",
        };
        write!(f, "{}", status_str)
    }
}

impl ResponseRecord for Light {
    fn from_json(value: &Value) -> Result<Self, DecodeError> {
        let id = required_str(value, "id")?;
        let power = required_str(value, "power")?;
        let brightness = required_f64(value, "brightness")?;
        let color = required_object(value, "color")?;
        let hue = required_f64(color, "hue")?;
        let saturation = required_f64(color, "saturation")?;
        let kelvin = required_i64(color, "kelvin")?;
        let label = required_str(value, "label")?;
        let connected = required_bool(value, "connected")?;

        Ok(Light {
            id: id.to_string(),
            power: power == "on",
            brightness,
            color: Color {
                hue,
                saturation,
                kelvin,
            },
            label: label.to_string(),
            connected,
        })
    }
}

impl ResponseRecord for CommandResult {
    fn from_json(value: &Value) -> Result<Self, DecodeError> {
        let id = required_str(value, "id")?;
        // A missing or unrecognized status is not a validation failure.
        let status = value
            .get("status")
            .and_then(Value::as_str)
            .map(CommandStatus::from_wire)
            .unwrap_or(CommandStatus::Unknown);

        Ok(CommandResult {
            id: id.to_string(),
            status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn light_requires_every_field() {
        let full = serde_json::json!({
            "id": "abcd",
            "power": "off",
            "brightness": 1.0,
            "color": {"hue": 0, "saturation": 0.25, "kelvin": 2700},
            "label": "Hallway",
            "connected": false
        });
        assert!(Light::from_json(&full).is_ok());

        for key in ["id", "power", "brightness", "color", "label", "connected"] {
            let mut partial = full.clone();
            partial.as_object_mut().unwrap().remove(key);
            assert!(
                Light::from_json(&partial).is_err(),
                "expected failure without {key}"
            );
        }
    }

    #[test]
    fn light_requires_every_color_field() {
        let full = serde_json::json!({
            "id": "abcd",
            "power": "on",
            "brightness": 1.0,
            "color": {"hue": 0, "saturation": 0.25, "kelvin": 2700},
            "label": "Hallway",
            "connected": true
        });

        for key in ["hue", "saturation", "kelvin"] {
            let mut partial = full.clone();
            partial["color"].as_object_mut().unwrap().remove(key);
            assert!(
                Light::from_json(&partial).is_err(),
                "expected failure without color.{key}"
            );
        }
    }

    #[test]
    fn power_maps_only_on_to_true() {
        let mut value = serde_json::json!({
            "id": "abcd",
            "power": "on",
            "brightness": 1.0,
            "color": {"hue": 0, "saturation": 0.25, "kelvin": 2700},
            "label": "Hallway",
            "connected": true
        });
        assert!(Light::from_json(&value).unwrap().power);

        value["power"] = Value::String("off".to_string());
        assert!(!Light::from_json(&value).unwrap().power);
    }

    #[test]
    fn status_serializes_snake_case() {
        let result = CommandResult {
            id: "abcd".to_string(),
            status: CommandStatus::TimedOut,
        };
        assert_eq!(
            serde_json::to_string(&result).unwrap(),
            r#"{"id":"abcd","status":"timed_out"}"#
        );
    }
}
