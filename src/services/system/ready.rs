use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::debug;

use super::SystemService;
use crate::models::{AppStartTime, ApiResponse, system::responses::ReadyResponse};

/// 就绪检查，附带进程运行时长
pub async fn ready(service: &SystemService, request: &HttpRequest) -> ActixResult<HttpResponse> {
    let now = chrono::Utc::now();
    let uptime_secs = request
        .app_data::<actix_web::web::Data<AppStartTime>>()
        .map(|start| now.signed_duration_since(start.start_datetime).num_seconds())
        .unwrap_or_default();

    debug!(
        "{} ready check, uptime {}s",
        service.get_config().app.system_name,
        uptime_secs
    );

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        ReadyResponse {
            status: "ready".to_string(),
            time: now,
            uptime_secs,
        },
        "Service is ready",
    )))
}
