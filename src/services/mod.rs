pub mod assignments;
pub mod system;
pub mod teachers;

pub use assignments::AssignmentService;
pub use system::SystemService;
pub use teachers::TeacherService;

use actix_web::HttpResponse;
use tracing::error;

use crate::errors::WorkflowError;
use crate::models::ApiResponse;

/// 将业务错误转换为统一格式的 HTTP 响应
///
/// 4xx 为调用方错误，不记录；其余按服务端故障记录日志。
pub(crate) fn workflow_error_response(err: &WorkflowError) -> HttpResponse {
    if !err.is_client_error() {
        error!("{}", err.format_simple());
    }
    HttpResponse::build(err.status()).json(ApiResponse::from_error(err))
}
