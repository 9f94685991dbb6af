use chrono::{DateTime, Duration, Utc};
use serde_json::{Map, Value, json};

use crate::domain::clock::to_iso8601;
use crate::domain::models::{Device, DeviceStatus, LogEntry, Severity};

/// Demo fleet: two devices per kind, one scale left offline.
pub fn seed_devices(now: DateTime<Utc>) -> Vec<Device> {
    let rows: [(&str, &str, &str, &str, DeviceStatus, i64, Value); 12] = [
        (
            "rfid-1",
            "Main Entrance Reader",
            "rfid_reader",
            "Main Entrance",
            DeviceStatus::Online,
            1,
            json!({ "scansToday": 142, "battery": 88 }),
        ),
        (
            "rfid-2",
            "Office Floor Reader",
            "rfid_reader",
            "Office Floor 2",
            DeviceStatus::Online,
            3,
            json!({ "scansToday": 94, "battery": 76 }),
        ),
        (
            "light-1",
            "Lobby Light",
            "smart_light",
            "Lobby",
            DeviceStatus::Online,
            2,
            json!({ "on": true, "brightness": 80, "power": 14.2 }),
        ),
        (
            "light-2",
            "Meeting Room Light",
            "smart_light",
            "Meeting Room A",
            DeviceStatus::Online,
            5,
            json!({ "on": false, "brightness": 0, "power": 0.0 }),
        ),
        (
            "outlet-1",
            "Pantry Outlet",
            "smart_outlet",
            "Pantry",
            DeviceStatus::Online,
            1,
            json!({ "on": true, "power": 640.0, "voltage": 220 }),
        ),
        (
            "outlet-2",
            "Server Rack Outlet",
            "smart_outlet",
            "Server Room",
            DeviceStatus::Online,
            1,
            json!({ "on": true, "power": 1105.0, "voltage": 220 }),
        ),
        (
            "plant-1",
            "Lobby Plant Monitor",
            "plant_watering",
            "Lobby",
            DeviceStatus::Online,
            10,
            json!({ "soilMoisture": 42, "humidity": 63, "battery": 67 }),
        ),
        (
            "plant-2",
            "Rooftop Garden Monitor",
            "plant_watering",
            "Rooftop",
            DeviceStatus::Online,
            12,
            json!({ "soilMoisture": 31, "humidity": 58, "battery": 54 }),
        ),
        (
            "weather-1",
            "Rooftop Weather Station",
            "weather_sensor",
            "Rooftop",
            DeviceStatus::Online,
            2,
            json!({ "temperature": 29.4, "humidity": 66 }),
        ),
        (
            "weather-2",
            "Parking Weather Station",
            "weather_sensor",
            "Parking Lot",
            DeviceStatus::Online,
            4,
            json!({ "temperature": 30.1, "humidity": 61 }),
        ),
        (
            "scale-1",
            "Warehouse Scale",
            "weight_scale",
            "Warehouse",
            DeviceStatus::Online,
            7,
            json!({ "weight": 48.25, "battery": 91 }),
        ),
        (
            "scale-2",
            "Mailroom Scale",
            "weight_scale",
            "Mailroom",
            DeviceStatus::Offline,
            180,
            json!({ "weight": 0.0, "battery": 12 }),
        ),
    ];

    rows.into_iter()
        .map(
            |(id, name, device_type, location, status, minutes_ago, readings)| Device {
                id: id.to_string(),
                name: name.to_string(),
                device_type: device_type.to_string(),
                location: location.to_string(),
                status,
                last_active: to_iso8601(now - Duration::minutes(minutes_ago)),
                readings: match readings {
                    Value::Object(map) => map,
                    _ => Map::new(),
                },
                extra: Map::new(),
            },
        )
        .collect()
}

/// Activity history, stored newest first like entries added at runtime.
pub fn seed_logs(now: DateTime<Utc>) -> Vec<LogEntry> {
    let rows = [
        (2, Severity::Info, "rfid-1", "Access granted for card ID-4821"),
        (9, Severity::Warning, "plant-2", "Soil moisture below threshold"),
        (17, Severity::Info, "light-1", "Light turned on by schedule"),
        (35, Severity::Error, "scale-2", "Scale stopped responding"),
        (48, Severity::Info, "outlet-2", "Power draw back to normal"),
        (63, Severity::Warning, "outlet-2", "Power draw above 1000 W"),
        (90, Severity::Info, "weather-1", "Weather changed to Sunny"),
        (125, Severity::Warning, "rfid-2", "Access denied for unknown card"),
    ];

    rows.into_iter()
        .map(|(minutes_ago, severity, device, message)| {
            let timestamp = now - Duration::minutes(minutes_ago);
            LogEntry {
                id: format!("log_{}", timestamp.timestamp_millis()),
                timestamp: to_iso8601(timestamp),
                severity,
                device: device.to_string(),
                message: message.to_string(),
                extra: Map::new(),
            }
        })
        .collect()
}
