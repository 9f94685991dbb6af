use std::sync::Arc;

use serde_json::Map;
use thiserror::Error;
use uuid::Uuid;

use crate::adapters::store::{Collection, RecordStore, StoreError, load_records, save_records};
use crate::domain::clock::{Clock, to_iso8601};
use crate::domain::models::{Device, DeviceStatus, LogEntry, NewLogEntry, Severity};
use crate::domain::query::{LogQuery, filter_devices_by_status, find_device, query_logs};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("storage unavailable: {0}")]
    StorageUnavailable(#[from] StoreError),
    #[error("device '{0}' not found")]
    DeviceNotFound(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

pub trait DeviceQueryHandler {
    fn list_devices(&self, status: Option<&str>) -> Result<Vec<Device>, ServiceError>;
    fn get_device(&self, id: &str) -> Result<Device, ServiceError>;
}

pub trait DeviceCommandHandler {
    fn update_device_status(&self, id: &str, status: &str) -> Result<Device, ServiceError>;
}

pub trait LogQueryHandler {
    fn list_logs(&self, query: &LogQuery) -> Result<Vec<LogEntry>, ServiceError>;
}

pub trait LogCommandHandler {
    fn add_log(&self, new_log: NewLogEntry) -> Result<LogEntry, ServiceError>;
}

/// Use-cases over the device and log collections.
///
/// Mutations are load, modify, save over the whole collection with nothing
/// held in between, so concurrent writers to one collection race and the
/// last save wins.
#[derive(Clone)]
pub struct RecordService {
    store: Arc<dyn RecordStore>,
    clock: Arc<dyn Clock>,
}

impl RecordService {
    pub fn new(store: Arc<dyn RecordStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    fn load_devices(&self) -> Result<Vec<Device>, ServiceError> {
        Ok(load_records(self.store.as_ref(), Collection::Devices)?)
    }

    fn load_logs(&self) -> Result<Vec<LogEntry>, ServiceError> {
        Ok(load_records(self.store.as_ref(), Collection::Logs)?)
    }
}

impl DeviceQueryHandler for RecordService {
    fn list_devices(&self, status: Option<&str>) -> Result<Vec<Device>, ServiceError> {
        let devices = self.load_devices()?;
        Ok(filter_devices_by_status(&devices, status))
    }

    fn get_device(&self, id: &str) -> Result<Device, ServiceError> {
        let devices = self.load_devices()?;
        find_device(&devices, id)
            .cloned()
            .ok_or_else(|| ServiceError::DeviceNotFound(id.to_string()))
    }
}

impl DeviceCommandHandler for RecordService {
    /// An unknown id is reported before the status value is checked.
    fn update_device_status(&self, id: &str, status: &str) -> Result<Device, ServiceError> {
        let mut devices = self.load_devices()?;
        let device = devices
            .iter_mut()
            .find(|device| device.id == id)
            .ok_or_else(|| ServiceError::DeviceNotFound(id.to_string()))?;
        let status = status
            .parse::<DeviceStatus>()
            .map_err(|error| ServiceError::InvalidInput(format!("status: {error}")))?;

        let previous = device.status;
        device.status = status;
        device.last_active = to_iso8601(self.clock.now());
        let updated = device.clone();

        save_records(self.store.as_ref(), Collection::Devices, &devices)?;

        tracing::info!(
            device_id = %updated.id,
            previous_status = %previous,
            status = %updated.status,
            "device status updated"
        );

        Ok(updated)
    }
}

impl LogQueryHandler for RecordService {
    fn list_logs(&self, query: &LogQuery) -> Result<Vec<LogEntry>, ServiceError> {
        let logs = self.load_logs()?;
        Ok(query_logs(&logs, query))
    }
}

impl LogCommandHandler for RecordService {
    fn add_log(&self, new_log: NewLogEntry) -> Result<LogEntry, ServiceError> {
        let severity = match new_log.severity.as_deref() {
            None => Severity::Info,
            Some(raw) => raw
                .parse::<Severity>()
                .map_err(|error| ServiceError::InvalidInput(format!("severity: {error}")))?,
        };

        let mut logs = self.load_logs()?;
        let now = self.clock.now();

        let entry = LogEntry {
            id: generate_log_id(now.timestamp_millis()),
            timestamp: to_iso8601(now),
            severity,
            device: new_log.device,
            message: new_log.message,
            extra: Map::new(),
        };
        logs.insert(0, entry.clone());

        save_records(self.store.as_ref(), Collection::Logs, &logs)?;

        tracing::info!(
            log_id = %entry.id,
            severity = %entry.severity,
            device = %entry.device,
            "log entry added"
        );

        Ok(entry)
    }
}

/// `log_<unix millis>_<8 hex>`; the random suffix keeps ids distinct within
/// one millisecond.
fn generate_log_id(unix_millis: i64) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("log_{unix_millis}_{}", &suffix[..8])
}
