//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码、类型名称和 HTTP 状态码。
//! 状态机相关的四类错误（Validation / NotFound / Authorization / InvalidState）
//! 对调用者可见；DatabaseOperation 表示事务已整体回滚的存储失败。

use std::fmt;

use actix_web::http::StatusCode;

use crate::models::ErrorCode;

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - status() 方法 - 返回对应的 HTTP 状态码
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_workflow_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal, $status:ident)
    ),* $(,)?) => {
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub enum WorkflowError {
            $($variant(String),)*
        }

        impl WorkflowError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(WorkflowError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(WorkflowError::$variant(_) => $type_name,)*
                }
            }

            /// 获取 HTTP 状态码
            pub fn status(&self) -> StatusCode {
                match self {
                    $(WorkflowError::$variant(_) => StatusCode::$status,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(WorkflowError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl WorkflowError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        WorkflowError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_workflow_errors! {
    CacheConnection("E001", "Cache Connection Error", INTERNAL_SERVER_ERROR),
    CachePluginNotFound("E002", "Cache Plugin Not Found", INTERNAL_SERVER_ERROR),
    DatabaseConfig("E003", "Database Configuration Error", INTERNAL_SERVER_ERROR),
    DatabaseConnection("E004", "Database Connection Error", INTERNAL_SERVER_ERROR),
    DatabaseOperation("E005", "Database Operation Error", INTERNAL_SERVER_ERROR),
    Validation("E007", "Validation Error", BAD_REQUEST),
    NotFound("E008", "Resource Not Found", NOT_FOUND),
    Authentication("E012", "Authentication Error", UNAUTHORIZED),
    Authorization("E013", "Authorization Error", FORBIDDEN),
    InvalidState("E014", "Invalid State Error", BAD_REQUEST),
}

impl WorkflowError {
    /// 对应的 API 响应错误码
    pub fn api_code(&self) -> ErrorCode {
        match self {
            WorkflowError::Validation(_) => ErrorCode::ValidationFailed,
            WorkflowError::NotFound(_) => ErrorCode::AssignmentNotFound,
            WorkflowError::Authentication(_) => ErrorCode::Unauthorized,
            WorkflowError::Authorization(_) => ErrorCode::Forbidden,
            WorkflowError::InvalidState(_) => ErrorCode::AssignmentInvalidState,
            _ => ErrorCode::InternalServerError,
        }
    }

    /// 是否为用户可见错误（4xx）
    pub fn is_client_error(&self) -> bool {
        self.status().is_client_error()
    }

    /// 格式化为彩色输出（用于开发环境）
    #[cfg(debug_assertions)]
    pub fn format_colored(&self) -> String {
        format!(
            "\x1b[1;31m[ERROR]\x1b[0m \x1b[33m{}\x1b[0m \x1b[31m{}\x1b[0m\n  {}",
            self.code(),
            self.error_type(),
            self.message()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for WorkflowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for WorkflowError {}

pub type Result<T> = std::result::Result<T, WorkflowError>;
