use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AssignmentService;
use crate::models::{
    ApiResponse, assignments::requests::SubmitAssignmentRequest, auth::entities::AuthPrincipal,
};
use crate::services::workflow_error_response;

pub async fn submit_assignment(
    service: &AssignmentService,
    request: &HttpRequest,
    principal: AuthPrincipal,
    req: SubmitAssignmentRequest,
) -> ActixResult<HttpResponse> {
    match service
        .workflow(request)
        .submit(req.id, req.teacher_id, &principal)
        .await
    {
        Ok(assignment) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            assignment,
            "Assignment submitted",
        ))),
        Err(e) => Ok(workflow_error_response(&e)),
    }
}
