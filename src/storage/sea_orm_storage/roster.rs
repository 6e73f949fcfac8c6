//! 名册存储操作（用户与角色表）

use super::SeaOrmStorage;
use crate::entity::prelude::*;
use crate::entity::{principals, students, teachers, users};
use crate::errors::{Result, WorkflowError};
use crate::models::{
    auth::entities::Role,
    roster::entities::{NewUser, RoleMember, Teacher, User},
};
use sea_orm::{ActiveModelTrait, EntityTrait, PaginatorTrait, QueryOrder, Set};

impl SeaOrmStorage {
    /// 用户总数
    pub async fn count_users_impl(&self) -> Result<u64> {
        Users::find()
            .count(&self.db)
            .await
            .map_err(|e| WorkflowError::database_operation(format!("查询用户总数失败: {e}")))
    }

    /// 创建用户
    pub async fn create_user_impl(&self, req: NewUser) -> Result<User> {
        let now = chrono::Utc::now().timestamp();

        let model = users::ActiveModel {
            username: Set(req.username),
            email: Set(req.email),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| WorkflowError::database_operation(format!("创建用户失败: {e}")))?;

        Ok(result.into_user())
    }

    /// 为用户创建角色记录
    pub async fn create_role_member_impl(&self, role: Role, user_id: i64) -> Result<RoleMember> {
        let now = chrono::Utc::now().timestamp();
        let map_err = |e: sea_orm::DbErr| {
            WorkflowError::database_operation(format!("创建{role}角色记录失败: {e}"))
        };

        let member = match role {
            Role::Student => students::ActiveModel {
                user_id: Set(user_id),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            }
            .insert(&self.db)
            .await
            .map_err(map_err)?
            .into_member(),
            Role::Teacher => teachers::ActiveModel {
                user_id: Set(user_id),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            }
            .insert(&self.db)
            .await
            .map_err(map_err)?
            .into_member(),
            Role::Principal => principals::ActiveModel {
                user_id: Set(user_id),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            }
            .insert(&self.db)
            .await
            .map_err(map_err)?
            .into_member(),
        };

        Ok(member)
    }

    /// 通过角色与角色内 ID 获取角色记录
    pub async fn get_role_member_impl(&self, role: Role, id: i64) -> Result<Option<RoleMember>> {
        let map_err = |e: sea_orm::DbErr| {
            WorkflowError::database_operation(format!("查询{role}角色记录失败: {e}"))
        };

        let member = match role {
            Role::Student => Students::find_by_id(id)
                .one(&self.db)
                .await
                .map_err(map_err)?
                .map(|m| m.into_member()),
            Role::Teacher => Teachers::find_by_id(id)
                .one(&self.db)
                .await
                .map_err(map_err)?
                .map(|m| m.into_member()),
            Role::Principal => Principals::find_by_id(id)
                .one(&self.db)
                .await
                .map_err(map_err)?
                .map(|m| m.into_member()),
        };

        Ok(member)
    }

    /// 通过 ID 获取教师
    pub async fn get_teacher_by_id_impl(&self, id: i64) -> Result<Option<Teacher>> {
        let result = Teachers::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| WorkflowError::database_operation(format!("查询教师失败: {e}")))?;

        Ok(result.map(|m| m.into_teacher()))
    }

    /// 列出全部教师
    pub async fn list_teachers_impl(&self) -> Result<Vec<Teacher>> {
        let results = Teachers::find()
            .order_by_asc(teachers::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| WorkflowError::database_operation(format!("查询教师列表失败: {e}")))?;

        Ok(results.into_iter().map(|m| m.into_teacher()).collect())
    }
}
