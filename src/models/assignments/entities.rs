use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::errors::{Result, WorkflowError};

// 作业状态
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, TS)]
#[serde(rename_all = "UPPERCASE")]
#[ts(export, export_to = "assignment.ts")]
pub enum AssignmentState {
    Draft,     // 草稿
    Submitted, // 已提交
    Graded,    // 已评分
}

impl AssignmentState {
    pub const DRAFT: &'static str = "DRAFT";
    pub const SUBMITTED: &'static str = "SUBMITTED";
    pub const GRADED: &'static str = "GRADED";

    /// 教师与校长可见的状态
    pub fn reviewable() -> &'static [AssignmentState] {
        &[AssignmentState::Submitted, AssignmentState::Graded]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AssignmentState::Draft => Self::DRAFT,
            AssignmentState::Submitted => Self::SUBMITTED,
            AssignmentState::Graded => Self::GRADED,
        }
    }
}

impl std::fmt::Display for AssignmentState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for AssignmentState {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            Self::DRAFT => Ok(AssignmentState::Draft),
            Self::SUBMITTED => Ok(AssignmentState::Submitted),
            Self::GRADED => Ok(AssignmentState::Graded),
            _ => Err(format!("Invalid assignment state: {s}")),
        }
    }
}

// 评分等级
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, TS)]
#[ts(export, export_to = "assignment.ts")]
pub enum Grade {
    A,
    B,
    C,
    D,
}

impl Grade {
    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
        }
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Grade {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "A" => Ok(Grade::A),
            "B" => Ok(Grade::B),
            "C" => Ok(Grade::C),
            "D" => Ok(Grade::D),
            _ => Err(format!("Invalid grade: '{s}'. Supported grades: A, B, C, D")),
        }
    }
}

// 作业实体
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "assignment.ts")]
pub struct Assignment {
    pub id: i64,
    pub student_id: i64,
    pub teacher_id: Option<i64>,
    pub content: Option<String>,
    pub grade: Option<Grade>,
    pub state: AssignmentState,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Assignment {
    pub fn has_content(&self) -> bool {
        self.content.as_deref().is_some_and(|c| !c.is_empty())
    }

    /// 校验实体不变量
    ///
    /// - 草稿没有成绩
    /// - 已提交或已评分的作业必须有教师和非空内容
    /// - 已评分的作业必须有成绩
    pub fn check_invariants(&self) -> Result<()> {
        match self.state {
            AssignmentState::Draft => {
                if self.grade.is_some() {
                    return Err(WorkflowError::invalid_state(
                        "draft assignment cannot carry a grade",
                    ));
                }
            }
            AssignmentState::Submitted | AssignmentState::Graded => {
                if self.teacher_id.is_none() {
                    return Err(WorkflowError::invalid_state(
                        "submitted assignment must have a teacher",
                    ));
                }
                if !self.has_content() {
                    return Err(WorkflowError::invalid_state(
                        "submitted assignment must have content",
                    ));
                }
                if self.state == AssignmentState::Graded && self.grade.is_none() {
                    return Err(WorkflowError::invalid_state(
                        "graded assignment must have a grade",
                    ));
                }
            }
        }
        Ok(())
    }
}

/// 待插入的新草稿
#[derive(Debug, Clone, PartialEq)]
pub struct NewAssignment {
    pub student_id: i64,
    pub content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(state: AssignmentState) -> Assignment {
        let now = chrono::Utc::now();
        Assignment {
            id: 1,
            student_id: 1,
            teacher_id: Some(1),
            content: Some("essay".to_string()),
            grade: None,
            state,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_grade_parsing() {
        assert_eq!("A".parse::<Grade>(), Ok(Grade::A));
        assert_eq!("D".parse::<Grade>(), Ok(Grade::D));
        assert!("AB".parse::<Grade>().is_err());
        assert!("a".parse::<Grade>().is_err());
        assert!("".parse::<Grade>().is_err());
    }

    #[test]
    fn test_state_round_trip_names() {
        for state in [
            AssignmentState::Draft,
            AssignmentState::Submitted,
            AssignmentState::Graded,
        ] {
            assert_eq!(state.to_string().parse::<AssignmentState>(), Ok(state));
        }
    }

    #[test]
    fn test_serialized_field_names() {
        let mut assignment = sample(AssignmentState::Graded);
        assignment.grade = Some(Grade::C);
        let json = serde_json::to_value(&assignment).unwrap();

        assert_eq!(json["state"], "GRADED");
        assert_eq!(json["grade"], "C");
        assert_eq!(json["student_id"], 1);
        assert_eq!(json["teacher_id"], 1);
        for key in ["id", "content", "created_at", "updated_at"] {
            assert!(json.get(key).is_some(), "missing field {key}");
        }
    }

    #[test]
    fn test_draft_serializes_null_grade() {
        let mut assignment = sample(AssignmentState::Draft);
        assignment.teacher_id = None;
        let json = serde_json::to_value(&assignment).unwrap();
        assert_eq!(json["state"], "DRAFT");
        assert!(json["grade"].is_null());
        assert!(json["teacher_id"].is_null());
    }

    #[test]
    fn test_invariants() {
        assert!(sample(AssignmentState::Submitted).check_invariants().is_ok());

        let mut graded = sample(AssignmentState::Graded);
        assert!(graded.check_invariants().is_err());
        graded.grade = Some(Grade::B);
        assert!(graded.check_invariants().is_ok());

        let mut orphan = sample(AssignmentState::Submitted);
        orphan.teacher_id = None;
        assert!(orphan.check_invariants().is_err());

        let mut blank = sample(AssignmentState::Submitted);
        blank.content = Some(String::new());
        assert!(blank.check_invariants().is_err());

        // 仅含空白的内容视为非空
        let mut spaces = sample(AssignmentState::Submitted);
        spaces.content = Some("   ".to_string());
        assert!(spaces.check_invariants().is_ok());

        let mut graded_draft = sample(AssignmentState::Draft);
        graded_draft.grade = Some(Grade::A);
        assert!(graded_draft.check_invariants().is_err());
    }
}
