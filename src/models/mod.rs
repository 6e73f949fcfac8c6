//! 数据模型定义
//!
//! 业务实体、请求与响应结构，与 `entity` 模块中的数据库实体分离。

pub mod assignments;
pub mod auth;
pub mod common;
pub mod roster;
pub mod system;

pub use common::response::ApiResponse;

/// 程序启动时间
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

/// API 响应错误码
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // 通用错误 1000+
    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1003,
    InternalServerError = 1005,
    ValidationFailed = 1006,

    // 身份相关 2000+
    PrincipalMissing = 2000,
    PrincipalInvalid = 2001,
    PrincipalRoleMismatch = 2002,

    // 作业相关 3000+
    AssignmentNotFound = 3000,
    AssignmentInvalidState = 3001,
}
