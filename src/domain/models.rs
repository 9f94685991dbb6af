use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceStatus {
    Online,
    Offline,
}

impl DeviceStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Online => "online",
            Self::Offline => "offline",
        }
    }
}

impl fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeviceStatus {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "online" => Ok(Self::Online),
            "offline" => Ok(Self::Offline),
            other => Err(UnknownVariant(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "info" => Ok(Self::Info),
            "warning" => Ok(Self::Warning),
            "error" => Ok(Self::Error),
            other => Err(UnknownVariant(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant(pub String);

impl fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unrecognized value '{}'", self.0)
    }
}

impl std::error::Error for UnknownVariant {}

/// A monitored device as stored in the `devices` collection.
///
/// `readings` has no shared schema; each device type reports its own keys.
/// Keys outside the known fields land in `extra` and are written back as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub device_type: String,
    #[serde(default)]
    pub location: String,
    pub status: DeviceStatus,
    #[serde(default)]
    pub last_active: String,
    #[serde(default)]
    pub readings: Map<String, Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub id: String,
    #[serde(default)]
    pub timestamp: String,
    pub severity: Severity,
    #[serde(default)]
    pub device: String,
    #[serde(default)]
    pub message: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Caller-supplied part of a log entry; id and timestamp are generated.
/// `severity` is still raw here and defaults to info when absent.
#[derive(Debug, Clone, PartialEq)]
pub struct NewLogEntry {
    pub severity: Option<String>,
    pub device: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{Device, DeviceStatus, LogEntry, Severity};

    #[test]
    fn device_uses_camel_case_and_type_key() {
        let device: Device = serde_json::from_value(json!({
            "id": "light-1",
            "name": "Lobby Light",
            "type": "smart_light",
            "location": "Lobby",
            "status": "online",
            "lastActive": "2026-02-20T10:00:00.000Z",
            "readings": { "power": 12.5, "on": true }
        }))
        .expect("device should decode");

        assert_eq!(device.device_type, "smart_light");
        assert_eq!(device.status, DeviceStatus::Online);
        assert_eq!(device.readings["on"], json!(true));

        let encoded = serde_json::to_value(&device).expect("device should encode");
        assert_eq!(encoded["type"], "smart_light");
        assert_eq!(encoded["lastActive"], "2026-02-20T10:00:00.000Z");
    }

    #[test]
    fn rejects_status_outside_enum() {
        let result = serde_json::from_value::<Device>(json!({
            "id": "d1",
            "name": "n",
            "type": "t",
            "location": "l",
            "status": "maintenance",
            "lastActive": "2026-02-20T10:00:00.000Z"
        }));

        assert!(result.is_err());
    }

    #[test]
    fn unknown_device_keys_survive_a_round_trip() {
        let stored = json!({
            "id": "d1",
            "type": "smart_light",
            "status": "online",
            "firmware": "1.2.3",
            "tags": ["lobby"]
        });

        let device: Device = serde_json::from_value(stored).expect("sparse device should decode");
        assert_eq!(device.name, "");
        assert_eq!(device.location, "");
        assert_eq!(device.extra["firmware"], json!("1.2.3"));

        let encoded = serde_json::to_value(&device).expect("device should encode");
        assert_eq!(encoded["firmware"], "1.2.3");
        assert_eq!(encoded["tags"], json!(["lobby"]));
    }

    #[test]
    fn parses_severity_names() {
        assert_eq!("warning".parse::<Severity>(), Ok(Severity::Warning));
        assert!("WARNING".parse::<Severity>().is_err());

        let entry: LogEntry = serde_json::from_value(json!({
            "id": "log_1",
            "timestamp": "2026-02-20T10:00:00.000Z",
            "severity": "error",
            "device": "scale-1",
            "message": "overload"
        }))
        .expect("log entry should decode");
        assert_eq!(entry.severity, Severity::Error);
    }

    #[test]
    fn unknown_status_names_the_value() {
        let error = "broken".parse::<DeviceStatus>().unwrap_err();
        assert_eq!(error.to_string(), "unrecognized value 'broken'");
    }
}
