use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AssignmentService;
use crate::models::ApiResponse;
use crate::services::workflow_error_response;

pub async fn assignment_stats(
    service: &AssignmentService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    match service.workflow(request).stats().await {
        Ok(stats) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            stats,
            "Grading statistics retrieved successfully",
        ))),
        Err(e) => Ok(workflow_error_response(&e)),
    }
}
