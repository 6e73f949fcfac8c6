//! 评分统计

use std::collections::BTreeMap;

use crate::models::assignments::{
    entities::{Assignment, AssignmentState, Grade},
    responses::{AssignmentStatsResponse, StudentGradedCount, TopGraderSummary},
};

/// 汇总已评分作业
///
/// - 每个学生的已评分作业数，按学生 id 升序
/// - 评分最多的教师（并列时取 id 最小者）及其 A 等级数量
///
/// 非 GRADED 状态的记录会被忽略。
pub fn grading_stats(assignments: &[Assignment]) -> AssignmentStatsResponse {
    let mut per_student: BTreeMap<i64, i64> = BTreeMap::new();
    // teacher_id -> (已评分数, A 等级数)
    let mut per_teacher: BTreeMap<i64, (i64, i64)> = BTreeMap::new();

    for assignment in assignments
        .iter()
        .filter(|a| a.state == AssignmentState::Graded)
    {
        *per_student.entry(assignment.student_id).or_default() += 1;

        if let Some(teacher_id) = assignment.teacher_id {
            let entry = per_teacher.entry(teacher_id).or_default();
            entry.0 += 1;
            if assignment.grade == Some(Grade::A) {
                entry.1 += 1;
            }
        }
    }

    // BTreeMap 按 id 升序遍历，只有严格更大时才替换，保证并列取最小 id
    let top_grader = per_teacher
        .into_iter()
        .fold(None::<TopGraderSummary>, |best, (teacher_id, (graded, grade_a))| {
            match best {
                Some(b) if b.graded_count >= graded => Some(b),
                _ => Some(TopGraderSummary {
                    teacher_id,
                    graded_count: graded,
                    grade_a_count: grade_a,
                }),
            }
        });

    AssignmentStatsResponse {
        graded_per_student: per_student
            .into_iter()
            .map(|(student_id, graded_count)| StudentGradedCount {
                student_id,
                graded_count,
            })
            .collect(),
        top_grader,
    }
}
