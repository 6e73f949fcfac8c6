//! 作业状态机
//!
//! `Draft → Submitted → Graded → Graded`，不允许回退。
//! 这里的函数都是纯函数：输入当前记录（可能不存在）和请求主体，
//! 输出待持久化的新记录或业务错误，不做任何 IO。

use crate::errors::{Result, WorkflowError};
use crate::models::{
    assignments::entities::{Assignment, AssignmentState, Grade, NewAssignment},
    auth::entities::{AuthPrincipal, Role},
};
use crate::utils::{assert_authorized, assert_found, assert_state, assert_valid};

pub const ASSIGNMENT_NOT_FOUND: &str = "No assignment with this id was found";

fn require_student(principal: &AuthPrincipal) -> Result<i64> {
    assert_authorized(
        principal.role == Role::Student,
        "requester should be a student",
    )?;
    Ok(principal.id)
}

fn require_owner(assignment: &Assignment, student_id: i64) -> Result<()> {
    assert_authorized(
        assignment.student_id == student_id,
        "This assignment belongs to some other student",
    )
}

/// 新建草稿，归属于当前学生
pub fn new_draft(principal: &AuthPrincipal, content: Option<String>) -> Result<NewAssignment> {
    let student_id = require_student(principal)?;
    Ok(NewAssignment {
        student_id,
        content,
    })
}

/// 编辑草稿内容
///
/// `content` 为 `None` 时保留原内容。
pub fn edit_draft(
    current: Option<Assignment>,
    principal: &AuthPrincipal,
    content: Option<String>,
) -> Result<Assignment> {
    let student_id = require_student(principal)?;
    let mut next = assert_found(current, ASSIGNMENT_NOT_FOUND)?;
    // 先校验归属，避免向其他学生暴露作业状态
    require_owner(&next, student_id)?;
    assert_state(
        next.state == AssignmentState::Draft,
        "only assignment in draft state can be edited",
    )?;

    if content.is_some() {
        next.content = content;
    }
    next.check_invariants()?;
    Ok(next)
}

/// 提交草稿给指定教师
///
/// `teacher_exists` 由调用方在事务外查询名册得到。
pub fn submit(
    current: Option<Assignment>,
    principal: &AuthPrincipal,
    teacher_id: i64,
    teacher_exists: bool,
) -> Result<Assignment> {
    let student_id = require_student(principal)?;
    let mut next = assert_found(current, ASSIGNMENT_NOT_FOUND)?;
    require_owner(&next, student_id)?;
    assert_state(
        next.state == AssignmentState::Draft,
        "only a draft assignment can be submitted",
    )?;
    assert_valid(
        next.has_content(),
        "assignment with empty content cannot be submitted",
    )?;
    assert_valid(teacher_exists, "No teacher with this id was found")?;

    next.teacher_id = Some(teacher_id);
    next.state = AssignmentState::Submitted;
    next.check_invariants()?;
    Ok(next)
}

/// 解析评分等级，缺失或不在 A/B/C/D 内时返回 `Validation`
pub fn parse_grade(raw: Option<&str>) -> Result<Grade> {
    let raw = raw.ok_or_else(|| {
        WorkflowError::validation("assignment with empty grade cannot be graded")
    })?;
    raw.parse::<Grade>().map_err(WorkflowError::validation)
}

/// 评分或重新评分
///
/// 教师只能评自己名下的作业；校长不受归属限制，但同样不能评草稿。
pub fn mark_grade(
    current: Option<Assignment>,
    principal: &AuthPrincipal,
    grade: Grade,
) -> Result<Assignment> {
    if !Role::grader_roles().contains(&principal.role) {
        return Err(WorkflowError::authorization(
            "requester should be a teacher or principal",
        ));
    }
    let mut next = assert_found(current, ASSIGNMENT_NOT_FOUND)?;

    match principal.role {
        Role::Teacher => {
            assert_authorized(
                next.teacher_id == Some(principal.id),
                "This assignment belongs to another teacher",
            )?;
            assert_state(
                AssignmentState::reviewable().contains(&next.state),
                "only submitted or graded assignments can be graded",
            )?;
        }
        // 校长不受归属限制
        _ => {
            assert_state(
                next.state != AssignmentState::Draft,
                "draft cannot be graded",
            )?;
        }
    }

    next.grade = Some(grade);
    next.state = AssignmentState::Graded;
    next.check_invariants()?;
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assignment(id: i64, state: AssignmentState) -> Assignment {
        let now = chrono::Utc::now();
        let submitted = state != AssignmentState::Draft;
        Assignment {
            id,
            student_id: 1,
            teacher_id: submitted.then_some(1),
            content: Some("x".to_string()),
            grade: (state == AssignmentState::Graded).then_some(Grade::D),
            state,
            created_at: now,
            updated_at: now,
        }
    }

    fn student(id: i64) -> AuthPrincipal {
        AuthPrincipal::student(id, id)
    }

    fn teacher(id: i64) -> AuthPrincipal {
        AuthPrincipal::teacher(id + 2, id)
    }

    fn principal() -> AuthPrincipal {
        AuthPrincipal::principal(5, 1)
    }

    #[test]
    fn test_new_draft_only_for_students() {
        let draft = new_draft(&student(2), Some("essay".into())).unwrap();
        assert_eq!(draft.student_id, 2);

        let err = new_draft(&teacher(1), None).unwrap_err();
        assert_eq!(err, WorkflowError::authorization("requester should be a student"));
    }

    #[test]
    fn test_edit_draft() {
        let edited = edit_draft(
            Some(assignment(5, AssignmentState::Draft)),
            &student(1),
            Some("new".into()),
        )
        .unwrap();
        assert_eq!(edited.content.as_deref(), Some("new"));
        assert_eq!(edited.state, AssignmentState::Draft);

        let kept = edit_draft(Some(assignment(5, AssignmentState::Draft)), &student(1), None)
            .unwrap();
        assert_eq!(kept.content.as_deref(), Some("x"));
    }

    #[test]
    fn test_edit_rejects_non_draft() {
        for state in [AssignmentState::Submitted, AssignmentState::Graded] {
            let err = edit_draft(Some(assignment(1, state)), &student(1), Some("y".into()))
                .unwrap_err();
            assert_eq!(
                err,
                WorkflowError::invalid_state("only assignment in draft state can be edited")
            );

            // 其他学生只会得到归属错误，看不到作业状态
            let err = edit_draft(Some(assignment(1, state)), &student(2), Some("y".into()))
                .unwrap_err();
            assert_eq!(
                err,
                WorkflowError::authorization("This assignment belongs to some other student")
            );
        }
    }

    #[test]
    fn test_edit_missing_and_foreign() {
        assert_eq!(
            edit_draft(None, &student(1), None).unwrap_err().code(),
            "E008"
        );
        assert_eq!(
            edit_draft(Some(assignment(5, AssignmentState::Draft)), &student(2), None)
                .unwrap_err()
                .code(),
            "E013"
        );
    }

    #[test]
    fn test_submit_success() {
        let submitted = submit(
            Some(assignment(5, AssignmentState::Draft)),
            &student(1),
            2,
            true,
        )
        .unwrap();
        assert_eq!(submitted.state, AssignmentState::Submitted);
        assert_eq!(submitted.teacher_id, Some(2));
        assert_eq!(submitted.grade, None);
    }

    #[test]
    fn test_submit_check_order() {
        // 不存在优先于教师校验
        assert_eq!(submit(None, &student(1), 99, false).unwrap_err().code(), "E008");

        let err = submit(
            Some(assignment(5, AssignmentState::Draft)),
            &student(2),
            1,
            true,
        )
        .unwrap_err();
        assert_eq!(
            err,
            WorkflowError::authorization("This assignment belongs to some other student")
        );

        let err = submit(
            Some(assignment(1, AssignmentState::Submitted)),
            &student(1),
            1,
            true,
        )
        .unwrap_err();
        assert_eq!(err.code(), "E014");

        for content in [None, Some(String::new())] {
            let mut empty = assignment(5, AssignmentState::Draft);
            empty.content = content;
            let err = submit(Some(empty), &student(1), 1, true).unwrap_err();
            assert_eq!(
                err,
                WorkflowError::validation("assignment with empty content cannot be submitted")
            );
        }

        let mut spaces = assignment(5, AssignmentState::Draft);
        spaces.content = Some("  ".into());
        let submitted = submit(Some(spaces), &student(1), 1, true).unwrap();
        assert_eq!(submitted.state, AssignmentState::Submitted);

        let err = submit(
            Some(assignment(5, AssignmentState::Draft)),
            &student(1),
            99,
            false,
        )
        .unwrap_err();
        assert_eq!(err.code(), "E007");
    }

    #[test]
    fn test_parse_grade() {
        assert_eq!(parse_grade(Some("B")), Ok(Grade::B));
        assert_eq!(parse_grade(None).unwrap_err().code(), "E007");
        assert_eq!(parse_grade(Some("AB")).unwrap_err().code(), "E007");
        assert_eq!(parse_grade(Some("INVALID_GRADE")).unwrap_err().code(), "E007");
    }

    #[test]
    fn test_teacher_grade_and_regrade() {
        let graded = mark_grade(
            Some(assignment(4, AssignmentState::Submitted)),
            &teacher(1),
            Grade::C,
        )
        .unwrap();
        assert_eq!((graded.state, graded.grade), (AssignmentState::Graded, Some(Grade::C)));

        let regraded = mark_grade(Some(graded), &teacher(1), Grade::B).unwrap();
        assert_eq!(
            (regraded.state, regraded.grade),
            (AssignmentState::Graded, Some(Grade::B))
        );
    }

    #[test]
    fn test_teacher_cannot_grade_foreign() {
        let err = mark_grade(
            Some(assignment(4, AssignmentState::Submitted)),
            &teacher(2),
            Grade::A,
        )
        .unwrap_err();
        assert_eq!(
            err,
            WorkflowError::authorization("This assignment belongs to another teacher")
        );
    }

    #[test]
    fn test_principal_grading() {
        let graded = mark_grade(
            Some(assignment(3, AssignmentState::Submitted)),
            &principal(),
            Grade::A,
        )
        .unwrap();
        assert_eq!(graded.grade, Some(Grade::A));

        let err = mark_grade(
            Some(assignment(5, AssignmentState::Draft)),
            &principal(),
            Grade::A,
        )
        .unwrap_err();
        assert_eq!(err, WorkflowError::invalid_state("draft cannot be graded"));
    }

    #[test]
    fn test_student_cannot_grade() {
        let err = mark_grade(
            Some(assignment(1, AssignmentState::Submitted)),
            &student(1),
            Grade::A,
        )
        .unwrap_err();
        assert_eq!(err.code(), "E013");
    }

    #[test]
    fn test_immutable_fields_preserved() {
        let before = assignment(4, AssignmentState::Submitted);
        let after = mark_grade(Some(before.clone()), &principal(), Grade::D).unwrap();
        assert_eq!(after.id, before.id);
        assert_eq!(after.student_id, before.student_id);
        assert_eq!(after.teacher_id, before.teacher_id);
        assert_eq!(after.content, before.content);
    }
}
