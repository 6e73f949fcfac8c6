//! 按角色划分的作业可见范围

use crate::models::{
    assignments::{entities::AssignmentState, requests::AssignmentFilter},
    auth::entities::{AuthPrincipal, Role},
};

/// 学生：本人全部作业（含草稿）
pub fn for_student(student_id: i64) -> AssignmentFilter {
    AssignmentFilter {
        student_id: Some(student_id),
        ..Default::default()
    }
}

/// 教师：提交给本人的已提交/已评分作业
pub fn for_teacher(teacher_id: i64) -> AssignmentFilter {
    AssignmentFilter {
        teacher_id: Some(teacher_id),
        states: Some(AssignmentState::reviewable().to_vec()),
        ..Default::default()
    }
}

/// 校长：全校已提交/已评分作业
pub fn for_principal() -> AssignmentFilter {
    AssignmentFilter {
        states: Some(AssignmentState::reviewable().to_vec()),
        ..Default::default()
    }
}

pub fn filter_for(principal: &AuthPrincipal) -> AssignmentFilter {
    match principal.role {
        Role::Student => for_student(principal.id),
        Role::Teacher => for_teacher(principal.id),
        Role::Principal => for_principal(),
    }
}
