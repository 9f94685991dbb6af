pub mod config;
mod error;
mod logging;
mod runtime;
pub mod services;

pub use error::AppError;

pub fn run() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    logging::init()?;

    let config = config::AppConfig::from_env()?;

    tracing::info!(
        http_bind = %config.http_bind,
        store_backend = %config.store_backend,
        data_dir = %config.data_dir,
        db_path = %config.db_path,
        http_workers = ?config.http_workers,
        "application bootstrap initialized"
    );

    runtime::run(config)
}
