//! 作业工作流
//!
//! 把状态机（纯逻辑）与存储层的原子读-改-写组合起来，
//! 对外提供 upsert / submit / mark_grade / list_for 四个操作。

pub mod query;
pub mod state_machine;
pub mod stats;

use std::sync::Arc;

use tracing::info;

use crate::errors::Result;
use crate::models::{
    assignments::{
        entities::{Assignment, AssignmentState},
        requests::{AssignmentFilter, UpsertAssignmentRequest},
        responses::AssignmentStatsResponse,
    },
    auth::entities::AuthPrincipal,
};
use crate::storage::Storage;

pub struct AssignmentWorkflow {
    storage: Arc<dyn Storage>,
}

impl AssignmentWorkflow {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// 新建或编辑草稿
    pub async fn upsert(
        &self,
        payload: UpsertAssignmentRequest,
        principal: &AuthPrincipal,
    ) -> Result<Assignment> {
        let UpsertAssignmentRequest { id, content } = payload;

        let Some(id) = id else {
            let draft = state_machine::new_draft(principal, content)?;
            let created = self.storage.create_assignment(draft).await?;
            info!(
                "Assignment {} drafted by student {}",
                created.id, created.student_id
            );
            return Ok(created);
        };

        let principal_copy = *principal;
        let edited = self
            .storage
            .transition_assignment(
                id,
                Box::new(move |current| {
                    state_machine::edit_draft(current, &principal_copy, content)
                }),
            )
            .await?;
        info!("Assignment {} draft edited by student {}", id, principal.id);
        Ok(edited)
    }

    /// 提交草稿
    pub async fn submit(
        &self,
        id: i64,
        teacher_id: i64,
        principal: &AuthPrincipal,
    ) -> Result<Assignment> {
        let teacher_exists = self.storage.get_teacher_by_id(teacher_id).await?.is_some();

        let principal_copy = *principal;
        let submitted = self
            .storage
            .transition_assignment(
                id,
                Box::new(move |current| {
                    state_machine::submit(current, &principal_copy, teacher_id, teacher_exists)
                }),
            )
            .await?;
        info!(
            "Assignment {} submitted by student {} to teacher {}",
            id, principal.id, teacher_id
        );
        Ok(submitted)
    }

    /// 评分或重新评分
    pub async fn mark_grade(
        &self,
        id: i64,
        grade: Option<&str>,
        principal: &AuthPrincipal,
    ) -> Result<Assignment> {
        // 等级校验先于任何读写
        let grade = state_machine::parse_grade(grade)?;

        let principal_copy = *principal;
        let graded = self
            .storage
            .transition_assignment(
                id,
                Box::new(move |current| state_machine::mark_grade(current, &principal_copy, grade)),
            )
            .await?;
        info!(
            "Assignment {} graded {} by {} {}",
            id, grade, principal.role, principal.id
        );
        Ok(graded)
    }

    /// 请求主体可见的作业，按 id 升序
    pub async fn list_for(&self, principal: &AuthPrincipal) -> Result<Vec<Assignment>> {
        self.storage
            .list_assignments(query::filter_for(principal))
            .await
    }

    /// 全校评分统计
    pub async fn stats(&self) -> Result<AssignmentStatsResponse> {
        let graded = self
            .storage
            .list_assignments(AssignmentFilter {
                states: Some(vec![AssignmentState::Graded]),
                ..Default::default()
            })
            .await?;
        Ok(stats::grading_stats(&graded))
    }
}
