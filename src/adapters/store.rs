use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use rusqlite::{Connection, OptionalExtension, params};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::domain::clock::{Clock, SystemClock, to_iso8601};

pub const LATEST_SCHEMA_VERSION: u32 = 1;

const MIGRATIONS: &[(u32, &str)] = &[(
    1,
    r#"
CREATE TABLE IF NOT EXISTS collections (
    name TEXT PRIMARY KEY,
    body TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
"#,
)];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Devices,
    Logs,
}

impl Collection {
    pub const ALL: [Collection; 2] = [Self::Devices, Self::Logs];

    pub fn name(self) -> &'static str {
        match self {
            Self::Devices => "devices",
            Self::Logs => "logs",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("collection '{0}' does not exist")]
    Missing(Collection),
    #[error("failed to access collection file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("collection '{collection}' is not valid JSON: {source}")]
    Json {
        collection: Collection,
        #[source]
        source: serde_json::Error,
    },
    #[error("collection '{collection}' is malformed: {reason}")]
    Malformed {
        collection: Collection,
        reason: String,
    },
    #[error("database operation failed: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("unsupported schema version {current}; latest supported is {latest}")]
    UnsupportedSchemaVersion { current: u32, latest: u32 },
    #[error("database lock poisoned")]
    LockPoisoned,
}

/// Whole-collection persistence. Every `load` reads the full collection and
/// every `save` replaces it; there is no caching, locking or versioning.
pub trait RecordStore: Send + Sync {
    fn load(&self, collection: Collection) -> Result<Vec<Value>, StoreError>;
    fn save(&self, collection: Collection, records: &[Value]) -> Result<(), StoreError>;
}

pub fn load_records<T: DeserializeOwned>(
    store: &dyn RecordStore,
    collection: Collection,
) -> Result<Vec<T>, StoreError> {
    store
        .load(collection)?
        .into_iter()
        .enumerate()
        .map(|(index, record)| {
            serde_json::from_value(record).map_err(|error| StoreError::Malformed {
                collection,
                reason: format!("record {index}: {error}"),
            })
        })
        .collect()
}

pub fn save_records<T: Serialize>(
    store: &dyn RecordStore,
    collection: Collection,
    records: &[T],
) -> Result<(), StoreError> {
    let values = records
        .iter()
        .map(serde_json::to_value)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|source| StoreError::Json { collection, source })?;
    store.save(collection, &values)
}

fn decode_collection(collection: Collection, content: &str) -> Result<Vec<Value>, StoreError> {
    match serde_json::from_str::<Value>(content)
        .map_err(|source| StoreError::Json { collection, source })?
    {
        Value::Array(records) => Ok(records),
        other => Err(StoreError::Malformed {
            collection,
            reason: format!("expected a top-level array, found {}", json_kind(&other)),
        }),
    }
}

fn encode_collection(collection: Collection, records: &[Value]) -> Result<String, StoreError> {
    serde_json::to_string_pretty(records).map_err(|source| StoreError::Json { collection, source })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// One pretty-printed JSON file per collection under `data_dir`.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    data_dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn path_for(&self, collection: Collection) -> PathBuf {
        self.data_dir.join(format!("{}.json", collection.name()))
    }

    pub fn exists(&self, collection: Collection) -> bool {
        self.path_for(collection).is_file()
    }
}

impl RecordStore for JsonFileStore {
    fn load(&self, collection: Collection) -> Result<Vec<Value>, StoreError> {
        let path = self.path_for(collection);
        let content = fs::read_to_string(&path).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => StoreError::Missing(collection),
            _ => StoreError::Io {
                path: path.clone(),
                source,
            },
        })?;
        decode_collection(collection, &content)
    }

    fn save(&self, collection: Collection, records: &[Value]) -> Result<(), StoreError> {
        let path = self.path_for(collection);
        let content = encode_collection(collection, records)?;
        fs::write(&path, content).map_err(|source| StoreError::Io { path, source })
    }
}

/// Collections kept as whole JSON documents, one row each, in an embedded
/// sqlite database.
pub struct SqliteStore {
    connection: Mutex<Connection>,
    clock: Box<dyn Clock>,
}

impl SqliteStore {
    pub fn open(path: &str) -> Result<Self, StoreError> {
        let mut connection = open_connection(path)?;
        run_migrations(&mut connection)?;
        Ok(Self::from_connection(connection))
    }

    pub fn from_connection(connection: Connection) -> Self {
        Self {
            connection: Mutex::new(connection),
            clock: Box::new(SystemClock),
        }
    }

    pub fn exists(&self, collection: Collection) -> Result<bool, StoreError> {
        let connection = self.connection.lock().map_err(|_| StoreError::LockPoisoned)?;
        let count: i64 = connection.query_row(
            "SELECT COUNT(*) FROM collections WHERE name = ?1",
            params![collection.name()],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }
}

impl RecordStore for SqliteStore {
    fn load(&self, collection: Collection) -> Result<Vec<Value>, StoreError> {
        let body: Option<String> = {
            let connection = self.connection.lock().map_err(|_| StoreError::LockPoisoned)?;
            connection
                .query_row(
                    "SELECT body FROM collections WHERE name = ?1",
                    params![collection.name()],
                    |row| row.get(0),
                )
                .optional()?
        };

        match body {
            Some(body) => decode_collection(collection, &body),
            None => Err(StoreError::Missing(collection)),
        }
    }

    fn save(&self, collection: Collection, records: &[Value]) -> Result<(), StoreError> {
        let body = encode_collection(collection, records)?;
        let connection = self.connection.lock().map_err(|_| StoreError::LockPoisoned)?;
        connection.execute(
            "INSERT INTO collections (name, body, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(name) DO UPDATE
             SET body = excluded.body, updated_at = excluded.updated_at",
            params![collection.name(), body, to_iso8601(self.clock.now())],
        )?;
        Ok(())
    }
}

pub fn open_connection(path: &str) -> Result<Connection, StoreError> {
    Connection::open(path).map_err(StoreError::from)
}

pub fn run_migrations(connection: &mut Connection) -> Result<(), StoreError> {
    let current_version = schema_version(connection)?;

    if current_version > LATEST_SCHEMA_VERSION {
        return Err(StoreError::UnsupportedSchemaVersion {
            current: current_version,
            latest: LATEST_SCHEMA_VERSION,
        });
    }

    let transaction = connection.transaction()?;

    for (version, sql) in MIGRATIONS {
        if *version > current_version {
            transaction.execute_batch(sql)?;
            transaction.pragma_update(None, "user_version", version)?;
        }
    }

    transaction.commit()?;

    Ok(())
}

pub fn schema_version(connection: &Connection) -> Result<u32, StoreError> {
    let version = connection.pragma_query_value(None, "user_version", |row| row.get(0))?;
    Ok(version)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use rusqlite::params;
    use serde_json::json;

    use super::{
        Collection, JsonFileStore, LATEST_SCHEMA_VERSION, RecordStore, SqliteStore, StoreError,
        load_records, open_connection, run_migrations, save_records, schema_version,
    };
    use crate::domain::models::{Device, DeviceStatus};

    fn temp_dir() -> PathBuf {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        let path = dir.path().to_path_buf();
        std::mem::forget(dir);
        path
    }

    fn temp_db_path(name: &str) -> String {
        temp_dir().join(name).to_string_lossy().into_owned()
    }

    #[test]
    fn json_store_reports_missing_file() {
        let store = JsonFileStore::new(temp_dir());
        let result = store.load(Collection::Devices);
        assert!(matches!(result, Err(StoreError::Missing(Collection::Devices))));
    }

    #[test]
    fn json_store_reports_unreadable_file_as_io_error() {
        let dir = temp_dir();
        std::fs::create_dir(dir.join("devices.json")).expect("dir should be created");

        let result = JsonFileStore::new(&dir).load(Collection::Devices);
        assert!(matches!(
            result,
            Err(StoreError::Io { ref path, .. }) if path == &dir.join("devices.json")
        ));
    }

    #[test]
    fn json_store_rejects_invalid_json() {
        let dir = temp_dir();
        std::fs::write(dir.join("logs.json"), "[{\"id\":").expect("write should succeed");

        let result = JsonFileStore::new(dir).load(Collection::Logs);
        assert!(matches!(result, Err(StoreError::Json { .. })));
    }

    #[test]
    fn json_store_rejects_non_array_top_level() {
        let dir = temp_dir();
        std::fs::write(dir.join("devices.json"), "{\"devices\":[]}").expect("write should succeed");

        let error = JsonFileStore::new(dir)
            .load(Collection::Devices)
            .unwrap_err();
        assert_eq!(
            error.to_string(),
            "collection 'devices' is malformed: expected a top-level array, found an object"
        );
    }

    #[test]
    fn json_store_round_trips_whole_collection_pretty_printed() {
        let dir = temp_dir();
        let store = JsonFileStore::new(&dir);
        let records = vec![json!({ "id": "a" }), json!({ "id": "b" })];

        store
            .save(Collection::Logs, &records)
            .expect("save should succeed");

        assert_eq!(store.load(Collection::Logs).expect("load"), records);
        let raw = std::fs::read_to_string(dir.join("logs.json")).expect("file exists");
        assert!(raw.starts_with("[\n  {\n    \"id\": \"a\""));
    }

    #[test]
    fn save_replaces_previous_contents() {
        let store = JsonFileStore::new(temp_dir());
        store
            .save(Collection::Logs, &[json!({ "id": "a" }), json!({ "id": "b" })])
            .expect("first save");
        store
            .save(Collection::Logs, &[json!({ "id": "c" })])
            .expect("second save");

        assert_eq!(
            store.load(Collection::Logs).expect("load"),
            vec![json!({ "id": "c" })]
        );
    }

    #[test]
    fn typed_load_flags_records_of_the_wrong_shape() {
        let dir = temp_dir();
        let body = r#"[{"id":"d1","type":"t","status":"broken"}]"#;
        std::fs::write(dir.join("devices.json"), body).expect("write should succeed");

        let store = JsonFileStore::new(dir);
        let result = load_records::<Device>(&store, Collection::Devices);
        assert!(matches!(
            result,
            Err(StoreError::Malformed {
                collection: Collection::Devices,
                ..
            })
        ));
    }

    #[test]
    fn typed_save_and_load_keep_order() {
        let store = JsonFileStore::new(temp_dir());
        let devices: Vec<Device> = ["d2", "d1"]
            .into_iter()
            .map(|id| Device {
                id: id.to_string(),
                name: "n".to_string(),
                device_type: "t".to_string(),
                location: "l".to_string(),
                status: DeviceStatus::Online,
                last_active: "2026-02-20T10:00:00.000Z".to_string(),
                readings: serde_json::Map::new(),
                extra: serde_json::Map::new(),
            })
            .collect();

        save_records(&store, Collection::Devices, &devices).expect("save should succeed");
        let loaded: Vec<Device> =
            load_records(&store, Collection::Devices).expect("load should succeed");
        assert_eq!(loaded, devices);
    }

    #[test]
    fn migrates_fresh_database_to_latest_version() {
        let mut connection = open_connection(&temp_db_path("fresh.sqlite")).expect("db opens");

        run_migrations(&mut connection).expect("migrations should succeed");

        assert_eq!(
            schema_version(&connection).expect("version"),
            LATEST_SCHEMA_VERSION
        );
        let table_exists: i64 = connection
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='collections'",
                [],
                |row| row.get(0),
            )
            .expect("table check should work");
        assert_eq!(table_exists, 1);
    }

    #[test]
    fn migrations_are_idempotent() {
        let mut connection = open_connection(&temp_db_path("idempotent.sqlite")).expect("db opens");

        run_migrations(&mut connection).expect("first run");
        run_migrations(&mut connection).expect("second run");

        assert_eq!(
            schema_version(&connection).expect("version"),
            LATEST_SCHEMA_VERSION
        );
    }

    #[test]
    fn rejects_newer_schema_version() {
        let mut connection = open_connection(&temp_db_path("future.sqlite")).expect("db opens");
        connection
            .pragma_update(None, "user_version", 99)
            .expect("pragma update");

        let result = run_migrations(&mut connection);
        assert!(matches!(
            result,
            Err(StoreError::UnsupportedSchemaVersion { current: 99, .. })
        ));
    }

    #[test]
    fn sqlite_store_upserts_and_reports_missing_rows() {
        let store = SqliteStore::open(&temp_db_path("store.sqlite")).expect("store opens");

        assert!(matches!(
            store.load(Collection::Logs),
            Err(StoreError::Missing(Collection::Logs))
        ));
        assert!(!store.exists(Collection::Logs).expect("exists query"));

        store
            .save(Collection::Logs, &[json!({ "id": "a" })])
            .expect("insert");
        store
            .save(Collection::Logs, &[json!({ "id": "b" }), json!({ "id": "a" })])
            .expect("update");

        assert_eq!(
            store.load(Collection::Logs).expect("load"),
            vec![json!({ "id": "b" }), json!({ "id": "a" })]
        );
        assert!(store.exists(Collection::Logs).expect("exists query"));
    }

    #[test]
    fn sqlite_store_rejects_corrupt_body() {
        let path = temp_db_path("corrupt.sqlite");
        let store = SqliteStore::open(&path).expect("store opens");
        {
            let connection = open_connection(&path).expect("second connection");
            connection
                .execute(
                    "INSERT INTO collections (name, body, updated_at) VALUES (?1, ?2, ?3)",
                    params!["devices", "\"not an array\"", "2026-02-20T10:00:00.000Z"],
                )
                .expect("insert should succeed");
        }

        assert!(matches!(
            store.load(Collection::Devices),
            Err(StoreError::Malformed { .. })
        ));
    }
}
