pub mod clock;
pub mod models;
pub mod query;
pub mod seed;
pub mod telemetry;
