use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AssignmentService;
use crate::models::{
    ApiResponse, assignments::responses::AssignmentListResponse, auth::entities::AuthPrincipal,
};
use crate::services::workflow_error_response;

pub async fn list_assignments(
    service: &AssignmentService,
    request: &HttpRequest,
    principal: AuthPrincipal,
) -> ActixResult<HttpResponse> {
    match service.workflow(request).list_for(&principal).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            AssignmentListResponse { items },
            "Assignments retrieved successfully",
        ))),
        Err(e) => Ok(workflow_error_response(&e)),
    }
}
