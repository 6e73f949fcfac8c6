use serde::Deserialize;
use ts_rs::TS;

use crate::models::assignments::entities::AssignmentState;

/// 创建或编辑草稿请求（无 id 时创建）
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "assignment.ts")]
pub struct UpsertAssignmentRequest {
    pub id: Option<i64>,
    pub content: Option<String>,
}

/// 提交作业请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "assignment.ts")]
pub struct SubmitAssignmentRequest {
    pub id: i64,
    pub teacher_id: i64,
}

/// 评分请求，grade 在状态机中按 A/B/C/D 校验
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "assignment.ts")]
pub struct GradeAssignmentRequest {
    pub id: i64,
    pub grade: Option<String>,
}

// 用于存储层的内部查询参数
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssignmentFilter {
    pub student_id: Option<i64>,
    pub teacher_id: Option<i64>,
    pub states: Option<Vec<AssignmentState>>,
}

impl AssignmentFilter {
    pub fn matches(&self, assignment: &super::entities::Assignment) -> bool {
        self.student_id.is_none_or(|id| assignment.student_id == id)
            && self
                .teacher_id
                .is_none_or(|id| assignment.teacher_id == Some(id))
            && self
                .states
                .as_ref()
                .is_none_or(|states| states.contains(&assignment.state))
    }
}
