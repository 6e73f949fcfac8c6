//! 作业存储操作

use super::SeaOrmStorage;
use crate::entity::assignments::{ActiveModel, Column, Entity as Assignments};
use crate::errors::{Result, WorkflowError};
use crate::models::assignments::{
    entities::{Assignment, AssignmentState, NewAssignment},
    requests::AssignmentFilter,
};
use crate::storage::AssignmentTransition;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, QueryFilter, QueryOrder,
    QuerySelect, Set, SqliteTransactionMode, TransactionOptions, TransactionTrait,
};
use tracing::debug;

impl SeaOrmStorage {
    /// 创建草稿
    pub async fn create_assignment_impl(&self, req: NewAssignment) -> Result<Assignment> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            student_id: Set(req.student_id),
            teacher_id: Set(None),
            content: Set(req.content),
            grade: Set(None),
            state: Set(AssignmentState::Draft.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| WorkflowError::database_operation(format!("创建作业失败: {e}")))?;

        result.into_assignment()
    }

    /// 通过 ID 获取作业
    pub async fn get_assignment_by_id_impl(&self, id: i64) -> Result<Option<Assignment>> {
        let result = Assignments::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| WorkflowError::database_operation(format!("查询作业失败: {e}")))?;

        result.map(|m| m.into_assignment()).transpose()
    }

    /// 按条件列出作业
    pub async fn list_assignments_impl(&self, filter: AssignmentFilter) -> Result<Vec<Assignment>> {
        let mut select = Assignments::find();

        if let Some(student_id) = filter.student_id {
            select = select.filter(Column::StudentId.eq(student_id));
        }

        if let Some(teacher_id) = filter.teacher_id {
            select = select.filter(Column::TeacherId.eq(teacher_id));
        }

        if let Some(ref states) = filter.states {
            select = select.filter(Column::State.is_in(states.iter().map(|s| s.as_str())));
        }

        let results = select
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| WorkflowError::database_operation(format!("查询作业列表失败: {e}")))?;

        results.into_iter().map(|m| m.into_assignment()).collect()
    }

    /// 原子读-改-写
    ///
    /// 在事务内以排他锁读取记录，交给 `transition` 计算新值后写回。
    /// 同一 id 的并发迁移串行执行，后到者读到先到者已提交的结果。
    /// `transition` 返回错误或任一步骤失败时，事务整体回滚。
    pub async fn transition_assignment_impl(
        &self,
        id: i64,
        transition: AssignmentTransition,
    ) -> Result<Assignment> {
        // SQLite 没有行锁，以 IMMEDIATE 开启事务，在读取前就取得写锁；
        // 其他后端忽略该选项，依靠 SELECT ... FOR UPDATE
        let txn = self
            .db
            .begin_with_options(TransactionOptions {
                sqlite_transaction_mode: Some(SqliteTransactionMode::Immediate),
                ..Default::default()
            })
            .await
            .map_err(|e| WorkflowError::database_operation(format!("开启事务失败: {e}")))?;

        let current = Assignments::find_by_id(id)
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(|e| WorkflowError::database_operation(format!("查询作业失败: {e}")))?;

        let Some(model) = current else {
            // 记录不存在时仍交给迁移函数决定返回哪种错误
            let err = match transition(None) {
                Ok(_) => WorkflowError::not_found(format!("No assignment with this id was found: {id}")),
                Err(e) => e,
            };
            rollback(txn).await;
            return Err(err);
        };

        let next = match model.clone().into_assignment().and_then(|a| transition(Some(a))) {
            Ok(next) => next,
            Err(e) => {
                rollback(txn).await;
                return Err(e);
            }
        };

        // 只写回可变字段，id、student_id 与 created_at 保持不变
        let mut active = model.into_active_model();
        active.teacher_id = Set(next.teacher_id);
        active.content = Set(next.content);
        active.grade = Set(next.grade.map(|g| g.to_string()));
        active.state = Set(next.state.to_string());
        active.updated_at = Set(chrono::Utc::now().timestamp());

        let updated = match active.update(&txn).await {
            Ok(updated) => updated,
            Err(e) => {
                rollback(txn).await;
                return Err(WorkflowError::database_operation(format!("更新作业失败: {e}")));
            }
        };

        txn.commit()
            .await
            .map_err(|e| WorkflowError::database_operation(format!("提交事务失败: {e}")))?;

        debug!("Assignment {} persisted in state {}", id, updated.state);

        updated.into_assignment()
    }
}

async fn rollback(txn: sea_orm::DatabaseTransaction) {
    if let Err(e) = txn.rollback().await {
        tracing::error!("回滚事务失败: {}", e);
    }
}
