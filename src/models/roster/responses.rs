use serde::Serialize;
use ts_rs::TS;

use super::entities::Teacher;

/// 教师列表响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "roster.ts")]
pub struct TeacherListResponse {
    pub items: Vec<Teacher>,
}
