use std::path::Path;

use chrono::Utc;
use iot_dashboard_api::adapters::store::{
    Collection, JsonFileStore, RecordStore, SqliteStore, StoreError, save_records,
};
use iot_dashboard_api::domain::seed::{seed_devices, seed_logs};

fn main() {
    if let Err(error) = run() {
        eprintln!("failed to create seed data: {error}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let mut backend = "json".to_string();
    let mut data_dir = "./data".to_string();
    let mut db_path = "./data/iot.db".to_string();
    let mut force = false;

    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut index = 0;
    while index < args.len() {
        match args[index].as_str() {
            "--backend" => {
                let Some(value) = args.get(index + 1) else {
                    return Err("--backend requires a value".to_string());
                };
                backend = value.clone();
                index += 2;
            }
            "--data-dir" => {
                let Some(value) = args.get(index + 1) else {
                    return Err("--data-dir requires a value".to_string());
                };
                data_dir = value.clone();
                index += 2;
            }
            "--db-path" => {
                let Some(value) = args.get(index + 1) else {
                    return Err("--db-path requires a value".to_string());
                };
                db_path = value.clone();
                index += 2;
            }
            "--force" => {
                force = true;
                index += 1;
            }
            "--help" | "-h" => {
                print_help();
                return Ok(());
            }
            other => {
                return Err(format!("unknown argument: {other}"));
            }
        }
    }

    match backend.as_str() {
        "json" => {
            std::fs::create_dir_all(&data_dir)
                .map_err(|error| format!("failed to create data directory: {error}"))?;
            let store = JsonFileStore::new(&data_dir);
            seed(&store, force, |collection| Ok(store.exists(collection)))?;
            println!("seeded json collections in: {data_dir}");
        }
        "sqlite" => {
            if let Some(parent) = Path::new(&db_path).parent()
                && !parent.as_os_str().is_empty()
            {
                std::fs::create_dir_all(parent)
                    .map_err(|error| format!("failed to create parent directory: {error}"))?;
            }
            let store = SqliteStore::open(&db_path).map_err(|error| error.to_string())?;
            seed(&store, force, |collection| store.exists(collection))?;
            println!("seeded sqlite collections in: {db_path}");
        }
        other => return Err(format!("unknown backend: {other} (expected json or sqlite)")),
    }

    Ok(())
}

fn seed(
    store: &dyn RecordStore,
    force: bool,
    exists: impl Fn(Collection) -> Result<bool, StoreError>,
) -> Result<(), String> {
    let now = Utc::now();

    for collection in Collection::ALL {
        if !force && exists(collection).map_err(|error| error.to_string())? {
            println!("keeping existing collection: {collection} (use --force to overwrite)");
            continue;
        }

        let written = match collection {
            Collection::Devices => {
                let devices = seed_devices(now);
                save_records(store, collection, &devices).map(|_| devices.len())
            }
            Collection::Logs => {
                let logs = seed_logs(now);
                save_records(store, collection, &logs).map(|_| logs.len())
            }
        }
        .map_err(|error| error.to_string())?;

        println!("wrote {written} records to collection: {collection}");
    }

    Ok(())
}

fn print_help() {
    println!("create_seed_data");
    println!();
    println!("Usage:");
    println!(
        "  cargo run --bin create_seed_data -- [--backend json|sqlite] [--data-dir <dir>] [--db-path <file>] [--force]"
    );
    println!();
    println!("Options:");
    println!("  --backend <name>  json (default) or sqlite");
    println!("  --data-dir <dir>  directory for devices.json and logs.json (default: ./data)");
    println!("  --db-path <file>  sqlite file for the sqlite backend (default: ./data/iot.db)");
    println!("  --force           overwrite collections that already exist");
}
