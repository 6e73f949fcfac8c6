//! 测试用存储：内存或临时文件 SQLite + 固定名册与作业

use std::sync::Arc;

use sea_orm::{ActiveModelTrait, Set};

use super::Storage;
use super::sea_orm_storage::SeaOrmStorage;
use crate::config::DatabaseConfig;
use crate::entity::assignments;
use crate::models::assignments::entities::{AssignmentState, Grade};
use crate::models::auth::entities::Role;
use crate::models::roster::entities::NewUser;

/// 空库（已迁移）
pub(crate) async fn memory_storage() -> Arc<SeaOrmStorage> {
    let config = DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        pool_size: 1,
        timeout: 5,
    };
    Arc::new(SeaOrmStorage::connect(&config).await.unwrap())
}

/// 临时文件库，可使用多连接连接池；`TempDir` 需与存储同生命周期
pub(crate) async fn file_storage(pool_size: u32) -> (tempfile::TempDir, Arc<SeaOrmStorage>) {
    let dir = tempfile::tempdir().unwrap();
    let config = DatabaseConfig {
        url: format!("sqlite://{}?mode=rwc", dir.path().join("assignments.db").display()),
        pool_size,
        timeout: 5,
    };
    let storage = Arc::new(SeaOrmStorage::connect(&config).await.unwrap());
    (dir, storage)
}

/// 名册：
/// - 学生 1（用户 1）、学生 2（用户 2）
/// - 教师 1（用户 3）、教师 2（用户 4）
/// - 校长 1（用户 5）
///
/// 作业：
/// | id | 学生 | 教师 | 状态 | 成绩 |
/// |----|------|------|------|------|
/// | 1 | 1 | 1 | SUBMITTED | - |
/// | 2 | 1 | 2 | SUBMITTED | - |
/// | 3 | 2 | 1 | SUBMITTED | - |
/// | 4 | 2 | 1 | SUBMITTED | - |
/// | 5 | 1 | - | DRAFT | - |
/// | 6 | 2 | 2 | GRADED | B |
/// | 7 | 2 | - | DRAFT（无内容） | - |
pub(crate) async fn seeded_storage() -> Arc<SeaOrmStorage> {
    let storage = memory_storage().await;
    seed(&storage).await;
    storage
}

/// 与 [`seeded_storage`] 相同的数据，落在多连接的文件库上
pub(crate) async fn seeded_file_storage(
    pool_size: u32,
) -> (tempfile::TempDir, Arc<SeaOrmStorage>) {
    let (dir, storage) = file_storage(pool_size).await;
    seed(&storage).await;
    (dir, storage)
}

async fn seed(storage: &SeaOrmStorage) {
    let roster = [
        ("student1", Role::Student),
        ("student2", Role::Student),
        ("teacher1", Role::Teacher),
        ("teacher2", Role::Teacher),
        ("principal", Role::Principal),
    ];
    for (name, role) in roster {
        let user = storage
            .create_user(NewUser::new(name, format!("{name}@example.com")))
            .await
            .unwrap();
        storage.create_role_member(role, user.id).await.unwrap();
    }

    let rows = [
        (1, Some(1), Some("ESSAY T1"), AssignmentState::Submitted, None),
        (1, Some(2), Some("THESIS T2"), AssignmentState::Submitted, None),
        (2, Some(1), Some("ESSAY T1 S2"), AssignmentState::Submitted, None),
        (2, Some(1), Some("SOLUTION T1 S2"), AssignmentState::Submitted, None),
        (1, None, Some("draft content"), AssignmentState::Draft, None),
        (2, Some(2), Some("GRADED T2 S2"), AssignmentState::Graded, Some(Grade::B)),
        (2, None, None, AssignmentState::Draft, None),
    ];
    let now = chrono::Utc::now().timestamp();
    for (student_id, teacher_id, content, state, grade) in rows {
        assignments::ActiveModel {
            student_id: Set(student_id),
            teacher_id: Set(teacher_id),
            content: Set(content.map(str::to_string)),
            grade: Set(grade.map(|g: Grade| g.to_string())),
            state: Set(state.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&storage.db)
        .await
        .unwrap();
    }
}

/// 以 trait 对象形式提供给服务层测试
pub(crate) async fn seeded_dyn_storage() -> Arc<dyn Storage> {
    seeded_storage().await
}
