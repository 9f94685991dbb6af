use actix_web::error::{InternalError, JsonPayloadError};
use actix_web::{HttpRequest, HttpResponse, Responder, get, post, web};
use serde::Deserialize;

use crate::app::services::{
    DeviceCommandHandler, DeviceQueryHandler, LogCommandHandler, LogQueryHandler, RecordService,
    ServiceError,
};
use crate::domain::clock::to_iso8601;
use crate::domain::models::NewLogEntry;
use crate::domain::query::LogQuery;
use crate::domain::telemetry::{self, DeviceKind};

#[derive(Clone)]
pub struct ApiState {
    pub records: RecordService,
}

#[derive(Debug, Deserialize)]
pub struct DeviceListQuery {
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct NewLogRequest {
    pub severity: Option<String>,
    #[serde(default)]
    pub device: String,
    #[serde(default)]
    pub message: String,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .app_data(web::JsonConfig::default().error_handler(json_body_error))
            .service(health)
            .service(list_devices_endpoint)
            .service(get_device_endpoint)
            .service(update_device_status_endpoint)
            .service(list_logs_endpoint)
            .service(add_log_endpoint)
            .service(analytics_endpoint)
            .service(device_types_endpoint)
            .service(rfid_stats_endpoint)
            .service(energy_stats_endpoint)
            .service(live_endpoint)
            .service(live_device_type_endpoint)
            .service(live_device_endpoint),
    );
}

#[get("/health")]
async fn health(state: web::Data<ApiState>) -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "timestamp": to_iso8601(state.records.clock().now()),
    }))
}

#[get("/devices")]
async fn list_devices_endpoint(
    state: web::Data<ApiState>,
    query: web::Query<DeviceListQuery>,
) -> impl Responder {
    match state.records.list_devices(query.status.as_deref()) {
        Ok(devices) => HttpResponse::Ok().json(devices),
        Err(error) => service_error_response(error, "failed to fetch devices"),
    }
}

#[get("/devices/{id}")]
async fn get_device_endpoint(state: web::Data<ApiState>, id: web::Path<String>) -> impl Responder {
    match state.records.get_device(&id) {
        Ok(device) => HttpResponse::Ok().json(device),
        Err(error) => service_error_response(error, "failed to fetch device"),
    }
}

#[post("/devices/{id}/status")]
async fn update_device_status_endpoint(
    state: web::Data<ApiState>,
    id: web::Path<String>,
    body: web::Json<StatusUpdateRequest>,
) -> impl Responder {
    match state.records.update_device_status(&id, &body.status) {
        Ok(device) => HttpResponse::Ok().json(device),
        Err(error) => service_error_response(error, "failed to update device"),
    }
}

#[get("/logs")]
async fn list_logs_endpoint(
    state: web::Data<ApiState>,
    query: web::Query<LogQuery>,
) -> impl Responder {
    match state.records.list_logs(&query) {
        Ok(logs) => HttpResponse::Ok().json(logs),
        Err(error) => service_error_response(error, "failed to fetch logs"),
    }
}

#[post("/logs")]
async fn add_log_endpoint(
    state: web::Data<ApiState>,
    body: web::Json<NewLogRequest>,
) -> impl Responder {
    let NewLogRequest {
        severity,
        device,
        message,
    } = body.into_inner();

    match state.records.add_log(NewLogEntry {
        severity,
        device,
        message,
    }) {
        Ok(entry) => HttpResponse::Created().json(entry),
        Err(error) => service_error_response(error, "failed to add log"),
    }
}

#[get("/analytics")]
async fn analytics_endpoint(state: web::Data<ApiState>) -> impl Responder {
    let today = state.records.clock().now().date_naive();
    let report = telemetry::analytics_report(&mut rand::thread_rng(), today);
    HttpResponse::Ok().json(report)
}

#[get("/analytics/device-types")]
async fn device_types_endpoint() -> impl Responder {
    HttpResponse::Ok().json(telemetry::device_type_distribution())
}

#[get("/analytics/rfid-stats")]
async fn rfid_stats_endpoint() -> impl Responder {
    HttpResponse::Ok().json(telemetry::rfid_stats())
}

#[get("/analytics/energy-stats")]
async fn energy_stats_endpoint() -> impl Responder {
    HttpResponse::Ok().json(telemetry::energy_stats())
}

#[get("/live")]
async fn live_endpoint(state: web::Data<ApiState>) -> impl Responder {
    let now = state.records.clock().now();
    HttpResponse::Ok().json(telemetry::live_snapshot(&mut rand::thread_rng(), now))
}

#[get("/live/type/{device_type}")]
async fn live_device_type_endpoint(
    state: web::Data<ApiState>,
    device_type: web::Path<String>,
) -> impl Responder {
    let Ok(kind) = device_type.parse::<DeviceKind>() else {
        return HttpResponse::NotFound().json(serde_json::json!({
            "error": "device type not found"
        }));
    };

    let now = state.records.clock().now();
    HttpResponse::Ok().json(telemetry::device_type_snapshot(
        &mut rand::thread_rng(),
        now,
        kind,
    ))
}

#[get("/live/{device_id}")]
async fn live_device_endpoint(
    state: web::Data<ApiState>,
    device_id: web::Path<String>,
) -> impl Responder {
    let now = state.records.clock().now();
    HttpResponse::Ok().json(telemetry::device_live_stub(&device_id, now))
}

fn json_body_error(error: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    tracing::debug!(error = %error, "rejected request body");
    let response = HttpResponse::BadRequest().json(serde_json::json!({
        "error": "invalid request body"
    }));
    InternalError::from_response(error, response).into()
}

fn service_error_response(error: ServiceError, context: &str) -> HttpResponse {
    match error {
        ServiceError::StorageUnavailable(error) => {
            tracing::warn!(error = %error, "{context}");
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": context
            }))
        }
        ServiceError::DeviceNotFound(_) => HttpResponse::NotFound().json(serde_json::json!({
            "error": "device not found"
        })),
        ServiceError::InvalidInput(reason) => HttpResponse::BadRequest().json(serde_json::json!({
            "error": format!("invalid input: {reason}")
        })),
    }
}
