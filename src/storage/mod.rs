use std::sync::Arc;

use crate::models::{
    assignments::{
        entities::{Assignment, NewAssignment},
        requests::AssignmentFilter,
    },
    auth::entities::Role,
    roster::entities::{NewUser, RoleMember, Teacher, User},
};

use crate::errors::Result;

pub mod sea_orm_storage;
#[cfg(test)]
pub(crate) mod testing;

/// 作业状态迁移函数
///
/// 在行锁内被调用一次：入参为当前记录（不存在时为 `None`），
/// 返回值为待写回的新记录；返回错误时整个事务回滚。
pub type AssignmentTransition =
    Box<dyn FnOnce(Option<Assignment>) -> Result<Assignment> + Send + 'static>;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 作业管理方法
    // 创建草稿
    async fn create_assignment(&self, assignment: NewAssignment) -> Result<Assignment>;
    // 通过ID获取作业
    async fn get_assignment_by_id(&self, id: i64) -> Result<Option<Assignment>>;
    // 按条件列出作业，按 id 升序
    async fn list_assignments(&self, filter: AssignmentFilter) -> Result<Vec<Assignment>>;
    // 原子读-改-写
    async fn transition_assignment(
        &self,
        id: i64,
        transition: AssignmentTransition,
    ) -> Result<Assignment>;

    /// 人员名册方法
    // 用户总数
    async fn count_users(&self) -> Result<u64>;
    // 创建用户
    async fn create_user(&self, user: NewUser) -> Result<User>;
    // 为用户创建角色记录
    async fn create_role_member(&self, role: Role, user_id: i64) -> Result<RoleMember>;
    // 通过角色和角色内ID获取角色记录
    async fn get_role_member(&self, role: Role, id: i64) -> Result<Option<RoleMember>>;
    // 通过ID获取教师
    async fn get_teacher_by_id(&self, id: i64) -> Result<Option<Teacher>>;
    // 列出教师
    async fn list_teachers(&self) -> Result<Vec<Teacher>>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
