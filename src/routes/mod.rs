pub mod assignments;

pub mod teachers;

pub mod system;

pub use assignments::configure_assignment_routes;
pub use system::configure_system_routes;

use actix_web::{HttpRequest, HttpResponse};

use crate::middlewares::RequirePrincipal;
use crate::models::{ApiResponse, ErrorCode, auth::entities::AuthPrincipal};

// 从请求扩展中取出主体，缺失时给出 401 响应
pub(crate) fn principal_or_unauthorized(req: &HttpRequest) -> Result<AuthPrincipal, HttpResponse> {
    RequirePrincipal::extract_principal(req).ok_or_else(|| {
        HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::PrincipalMissing,
            "principal not found",
        ))
    })
}
