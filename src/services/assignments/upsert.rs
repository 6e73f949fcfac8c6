use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AssignmentService;
use crate::models::{
    ApiResponse, assignments::requests::UpsertAssignmentRequest, auth::entities::AuthPrincipal,
};
use crate::services::workflow_error_response;

pub async fn upsert_assignment(
    service: &AssignmentService,
    request: &HttpRequest,
    principal: AuthPrincipal,
    req: UpsertAssignmentRequest,
) -> ActixResult<HttpResponse> {
    let creating = req.id.is_none();

    match service.workflow(request).upsert(req, &principal).await {
        Ok(assignment) if creating => Ok(HttpResponse::Created().json(ApiResponse::success(
            assignment,
            "Assignment draft created",
        ))),
        Ok(assignment) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            assignment,
            "Assignment draft updated",
        ))),
        Err(e) => Ok(workflow_error_response(&e)),
    }
}
