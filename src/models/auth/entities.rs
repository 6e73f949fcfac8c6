use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::errors::{Result, WorkflowError};

// 身份角色
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "auth.ts")]
pub enum Role {
    Student,   // 学生
    Teacher,   // 教师
    Principal, // 校长
}

impl Role {
    pub const STUDENT: &'static str = "student";
    pub const TEACHER: &'static str = "teacher";
    pub const PRINCIPAL: &'static str = "principal";

    /// 可以评分的角色
    pub fn grader_roles() -> &'static [Role] {
        &[Role::Teacher, Role::Principal]
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Student => write!(f, "{}", Role::STUDENT),
            Role::Teacher => write!(f, "{}", Role::TEACHER),
            Role::Principal => write!(f, "{}", Role::PRINCIPAL),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            Role::STUDENT => Ok(Role::Student),
            Role::TEACHER => Ok(Role::Teacher),
            Role::PRINCIPAL => Ok(Role::Principal),
            _ => Err(format!("Invalid role: {s}")),
        }
    }
}

/// `X-Principal` 请求头中携带的身份声明
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, TS)]
#[ts(export, export_to = "auth.ts")]
pub struct PrincipalClaims {
    pub user_id: i64,
    pub student_id: Option<i64>,
    pub teacher_id: Option<i64>,
    pub principal_id: Option<i64>,
}

/// 已解析的请求主体：角色 + 角色内编号
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[ts(export, export_to = "auth.ts")]
pub struct AuthPrincipal {
    pub user_id: i64,
    pub role: Role,
    pub id: i64,
}

impl AuthPrincipal {
    pub fn student(user_id: i64, id: i64) -> Self {
        Self {
            user_id,
            role: Role::Student,
            id,
        }
    }

    pub fn teacher(user_id: i64, id: i64) -> Self {
        Self {
            user_id,
            role: Role::Teacher,
            id,
        }
    }

    pub fn principal(user_id: i64, id: i64) -> Self {
        Self {
            user_id,
            role: Role::Principal,
            id,
        }
    }

    /// 从身份声明构造，必须恰好携带一个角色编号
    pub fn from_claims(claims: &PrincipalClaims) -> Result<Self> {
        let roles = [
            (Role::Student, claims.student_id),
            (Role::Teacher, claims.teacher_id),
            (Role::Principal, claims.principal_id),
        ];
        let mut present = roles
            .into_iter()
            .filter_map(|(role, id)| id.map(|id| (role, id)));

        match (present.next(), present.next()) {
            (Some((role, id)), None) => Ok(Self {
                user_id: claims.user_id,
                role,
                id,
            }),
            (None, _) => Err(WorkflowError::authentication(
                "principal carries no role identity",
            )),
            (Some(_), Some(_)) => Err(WorkflowError::authentication(
                "principal carries more than one role identity",
            )),
        }
    }
}
