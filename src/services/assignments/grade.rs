use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AssignmentService;
use crate::models::{
    ApiResponse, assignments::requests::GradeAssignmentRequest, auth::entities::AuthPrincipal,
};
use crate::services::workflow_error_response;

/// 教师与校长共用，归属规则由状态机按角色区分
pub async fn grade_assignment(
    service: &AssignmentService,
    request: &HttpRequest,
    principal: AuthPrincipal,
    req: GradeAssignmentRequest,
) -> ActixResult<HttpResponse> {
    match service
        .workflow(request)
        .mark_grade(req.id, req.grade.as_deref(), &principal)
        .await
    {
        Ok(assignment) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            assignment,
            "Assignment graded",
        ))),
        Err(e) => Ok(workflow_error_response(&e)),
    }
}
