use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer, web};

use crate::adapters::api::{ApiState, configure_routes};
use crate::adapters::store::{Collection, JsonFileStore, RecordStore, SqliteStore};
use crate::app::config::{AppConfig, StoreBackend};
use crate::app::error::AppError;
use crate::app::services::RecordService;
use crate::domain::clock::SystemClock;

pub fn build_store(config: &AppConfig) -> Result<Arc<dyn RecordStore>, AppError> {
    let store: Arc<dyn RecordStore> = match config.store_backend {
        StoreBackend::Json => {
            let store = JsonFileStore::new(&config.data_dir);
            if !store.data_dir().is_dir() {
                return Err(AppError::store_init(format!(
                    "data directory {} does not exist",
                    store.data_dir().display()
                )));
            }
            Arc::new(store)
        }
        StoreBackend::Sqlite => {
            Arc::new(SqliteStore::open(&config.db_path).map_err(AppError::store_init)?)
        }
    };

    for collection in Collection::ALL {
        if let Err(error) = store.load(collection) {
            tracing::warn!(
                collection = %collection,
                error = %error,
                "collection not readable at startup; requests touching it will fail"
            );
        }
    }

    Ok(store)
}

pub fn run(config: AppConfig) -> Result<(), AppError> {
    let store = build_store(&config)?;
    let api_state = ApiState {
        records: RecordService::new(store, Arc::new(SystemClock)),
    };

    tracing::info!(bind = %config.http_bind, "http server starting");

    actix_web::rt::System::new()
        .block_on(async move {
            let mut server = HttpServer::new(move || {
                App::new()
                    .wrap(Cors::permissive())
                    .app_data(web::Data::new(api_state.clone()))
                    .configure(configure_routes)
            });
            if let Some(workers) = config.http_workers {
                server = server.workers(workers);
            }

            server.bind(&config.http_bind)?.run().await
        })
        .map_err(AppError::runtime)
}
