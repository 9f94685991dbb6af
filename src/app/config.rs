use std::fmt;
use std::str::FromStr;

use crate::app::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Json,
    Sqlite,
}

impl fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Json => "json",
            Self::Sqlite => "sqlite",
        })
    }
}

impl FromStr for StoreBackend {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "sqlite" => Ok(Self::Sqlite),
            _ => Err(AppError::config("STORE_BACKEND must be one of: json, sqlite")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub http_bind: String,
    pub store_backend: StoreBackend,
    pub data_dir: String,
    pub db_path: String,
    pub http_workers: Option<usize>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let store_backend = match non_empty(&lookup, "STORE_BACKEND") {
            Some(raw) => raw.parse()?,
            None => StoreBackend::Json,
        };

        let http_workers = match non_empty(&lookup, "HTTP_WORKERS") {
            Some(raw) => Some(
                raw.parse::<usize>()
                    .ok()
                    .filter(|workers| *workers > 0)
                    .ok_or_else(|| AppError::config("HTTP_WORKERS must be a positive number"))?,
            ),
            None => None,
        };

        Ok(Self {
            http_bind: non_empty(&lookup, "HTTP_BIND")
                .unwrap_or_else(|| "0.0.0.0:5000".to_string()),
            store_backend,
            data_dir: non_empty(&lookup, "DATA_DIR").unwrap_or_else(|| "./data".to_string()),
            db_path: non_empty(&lookup, "DB_PATH").unwrap_or_else(|| "./data/iot.db".to_string()),
            http_workers,
        })
    }
}

fn non_empty<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
