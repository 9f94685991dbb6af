use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::adapters::api::ApiState;
use crate::adapters::store::{Collection, RecordStore, StoreError};
use crate::app::services::RecordService;
use crate::domain::clock::Clock;
use crate::domain::models::{Device, DeviceStatus, LogEntry, Severity};

/// Store fake holding each collection as a JSON array in memory. A
/// collection that was never put or saved behaves like a missing file.
#[derive(Default)]
pub struct InMemoryStore {
    collections: Mutex<HashMap<Collection, Vec<Value>>>,
    saves: Mutex<HashMap<Collection, usize>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put<T: Serialize>(&self, collection: Collection, records: &[T]) {
        let values = records
            .iter()
            .map(|record| serde_json::to_value(record).expect("record should serialize"))
            .collect();
        self.collections
            .lock()
            .expect("store lock should be available")
            .insert(collection, values);
    }

    pub fn save_count(&self, collection: Collection) -> usize {
        self.saves
            .lock()
            .expect("store lock should be available")
            .get(&collection)
            .copied()
            .unwrap_or(0)
    }
}

impl RecordStore for InMemoryStore {
    fn load(&self, collection: Collection) -> Result<Vec<Value>, StoreError> {
        self.collections
            .lock()
            .map_err(|_| StoreError::LockPoisoned)?
            .get(&collection)
            .cloned()
            .ok_or(StoreError::Missing(collection))
    }

    fn save(&self, collection: Collection, records: &[Value]) -> Result<(), StoreError> {
        self.collections
            .lock()
            .map_err(|_| StoreError::LockPoisoned)?
            .insert(collection, records.to_vec());
        *self
            .saves
            .lock()
            .map_err(|_| StoreError::LockPoisoned)?
            .entry(collection)
            .or_insert(0) += 1;
        Ok(())
    }
}

pub struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn now_value(&self) -> DateTime<Utc> {
        *self.now.lock().expect("clock lock should be available")
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().expect("clock lock should be available");
        *now += by;
    }
}

impl Default for FixedClock {
    fn default() -> Self {
        Self::at(
            Utc.with_ymd_and_hms(2026, 2, 21, 8, 0, 0)
                .single()
                .expect("fixed clock start should be valid"),
        )
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now_value()
    }
}

pub fn sample_device(id: &str, status: DeviceStatus) -> Device {
    Device {
        id: id.to_string(),
        name: format!("Device {id}"),
        device_type: "smart_outlet".to_string(),
        location: "Lab".to_string(),
        status,
        last_active: "2026-02-20T10:00:00.000Z".to_string(),
        readings: Map::new(),
        extra: Map::new(),
    }
}

/// Log entry stamped `minute` minutes past 2026-02-20T10:00Z.
pub fn sample_log(
    id: &str,
    minute: u32,
    severity: Severity,
    device: &str,
    message: &str,
) -> LogEntry {
    LogEntry {
        id: id.to_string(),
        timestamp: format!("2026-02-20T10:{minute:02}:00.000Z"),
        severity,
        device: device.to_string(),
        message: message.to_string(),
        extra: Map::new(),
    }
}

pub fn build_state(store: Arc<InMemoryStore>) -> ApiState {
    ApiState {
        records: RecordService::new(store, Arc::new(FixedClock::default())),
    }
}
