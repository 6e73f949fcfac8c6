use serde::Serialize;
use ts_rs::TS;

use crate::models::assignments::entities::Assignment;

/// 作业列表响应（无分页）
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "assignment.ts")]
pub struct AssignmentListResponse {
    pub items: Vec<Assignment>,
}

/// 学生已评分作业数
#[derive(Debug, Clone, Serialize, PartialEq, Eq, TS)]
#[ts(export, export_to = "assignment.ts")]
pub struct StudentGradedCount {
    pub student_id: i64,
    pub graded_count: i64,
}

/// 评分最多的教师及其 A 等级数量
#[derive(Debug, Clone, Serialize, PartialEq, Eq, TS)]
#[ts(export, export_to = "assignment.ts")]
pub struct TopGraderSummary {
    pub teacher_id: i64,
    pub graded_count: i64,
    pub grade_a_count: i64,
}

/// 评分统计响应
#[derive(Debug, Clone, Serialize, PartialEq, Eq, TS)]
#[ts(export, export_to = "assignment.ts")]
pub struct AssignmentStatsResponse {
    pub graded_per_student: Vec<StudentGradedCount>,
    pub top_grader: Option<TopGraderSummary>,
}
