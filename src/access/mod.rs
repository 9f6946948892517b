//! 访问控制
//!
//! 角色校验与归属链判断（教师 → 科目 → 作业 → 提交，学生 → 本人提交/考勤）。
//! 纯判断函数不访问存储，便于单独测试；异步辅助函数负责加载资源并按固定顺序
//! 返回 NotFound / Forbidden。

use std::sync::Arc;

use tracing::warn;

use crate::errors::{ClassroomError, Result};
use crate::models::{
    assignments::entities::Assignment,
    subjects::entities::Subject,
    submissions::entities::Submission,
    users::entities::{User, UserRole},
};
use crate::storage::Storage;

pub const SUBJECT_NOT_FOUND: &str = "Subject not found or access denied!";
pub const ASSIGNMENT_NOT_FOUND: &str = "Assignment not found!";
pub const SUBMISSION_NOT_FOUND: &str = "Submission not found!";
pub const ACCESS_DENIED: &str = "Access denied!";

/// 已认证的操作者，按角色区分
#[derive(Debug, Clone)]
pub enum Actor {
    Teacher(User),
    Student(User),
}

impl Actor {
    pub fn user(&self) -> &User {
        match self {
            Actor::Teacher(user) | Actor::Student(user) => user,
        }
    }

    pub fn id(&self) -> i64 {
        self.user().id
    }

    pub fn role(&self) -> UserRole {
        match self {
            Actor::Teacher(_) => UserRole::Teacher,
            Actor::Student(_) => UserRole::Student,
        }
    }
}

impl From<User> for Actor {
    fn from(user: User) -> Self {
        match user.role {
            UserRole::Teacher => Actor::Teacher(user),
            UserRole::Student => Actor::Student(user),
        }
    }
}

/// 要求精确角色
pub fn require_role(user: &User, role: UserRole) -> Result<()> {
    if user.role == role {
        Ok(())
    } else {
        warn!(
            "User {} with role {} denied, {} required",
            user.id, user.role, role
        );
        Err(ClassroomError::authorization(format!(
            "{} access required!",
            role.as_str()
        )))
    }
}

pub fn require_teacher(user: &User) -> Result<()> {
    require_role(user, UserRole::Teacher)
}

pub fn require_student(user: &User) -> Result<()> {
    require_role(user, UserRole::Student)
}

/// 教师是否拥有科目
pub fn owns_subject(teacher: &User, subject: &Subject) -> bool {
    teacher.is_teacher() && subject.teacher_id == teacher.id
}

/// 学生是否拥有提交
pub fn owns_submission(student: &User, submission: &Submission) -> bool {
    student.is_student() && submission.student_id == student.id
}

/// 提交的读取权限：提交者本人，或作业所属科目的教师
pub fn can_read_submission(user: &User, submission: &Submission, subject: Option<&Subject>) -> bool {
    owns_submission(user, submission) || subject.is_some_and(|s| owns_subject(user, s))
}

/// 加载教师拥有的科目，不存在与无权限统一返回 NotFound
pub async fn owned_subject(
    storage: &Arc<dyn Storage>,
    teacher: &User,
    subject_id: i64,
) -> Result<Subject> {
    match storage.get_subject_by_id(subject_id).await? {
        Some(subject) if owns_subject(teacher, &subject) => Ok(subject),
        Some(_) => {
            warn!(
                "Teacher {} tried to access subject {} owned by another teacher",
                teacher.id, subject_id
            );
            Err(ClassroomError::not_found(SUBJECT_NOT_FOUND))
        }
        None => Err(ClassroomError::not_found(SUBJECT_NOT_FOUND)),
    }
}

/// 加载教师拥有的作业：先判断存在，再判断归属
pub async fn owned_assignment(
    storage: &Arc<dyn Storage>,
    teacher: &User,
    assignment_id: i64,
) -> Result<(Assignment, Subject)> {
    let assignment = storage
        .get_assignment_by_id(assignment_id)
        .await?
        .ok_or_else(|| ClassroomError::not_found(ASSIGNMENT_NOT_FOUND))?;
    let subject = storage.get_subject_by_id(assignment.subject_id).await?;

    match subject {
        Some(subject) if owns_subject(teacher, &subject) => Ok((assignment, subject)),
        _ => {
            warn!(
                "Teacher {} denied access to assignment {}",
                teacher.id, assignment_id
            );
            Err(ClassroomError::authorization(ACCESS_DENIED))
        }
    }
}

/// 加载提交所在科目（作业 → 科目）
async fn submission_subject(
    storage: &Arc<dyn Storage>,
    submission: &Submission,
) -> Result<Option<Subject>> {
    let Some(assignment) = storage.get_assignment_by_id(submission.assignment_id).await? else {
        return Ok(None);
    };
    storage.get_subject_by_id(assignment.subject_id).await
}

/// 加载教师可评分的提交
pub async fn gradable_submission(
    storage: &Arc<dyn Storage>,
    teacher: &User,
    submission_id: i64,
) -> Result<Submission> {
    let submission = storage
        .get_submission_by_id(submission_id)
        .await?
        .ok_or_else(|| ClassroomError::not_found(SUBMISSION_NOT_FOUND))?;
    let subject = submission_subject(storage, &submission).await?;

    if subject.as_ref().is_some_and(|s| owns_subject(teacher, s)) {
        Ok(submission)
    } else {
        warn!(
            "Teacher {} denied grading submission {}",
            teacher.id, submission_id
        );
        Err(ClassroomError::authorization(ACCESS_DENIED))
    }
}

/// 加载用户可读取（下载）的提交
pub async fn readable_submission(
    storage: &Arc<dyn Storage>,
    user: &User,
    submission_id: i64,
) -> Result<Submission> {
    let submission = storage
        .get_submission_by_id(submission_id)
        .await?
        .ok_or_else(|| ClassroomError::not_found(SUBMISSION_NOT_FOUND))?;

    // 本人提交无需再查科目
    if owns_submission(user, &submission) {
        return Ok(submission);
    }

    let subject = if user.is_teacher() {
        submission_subject(storage, &submission).await?
    } else {
        None
    };
    if can_read_submission(user, &submission, subject.as_ref()) {
        Ok(submission)
    } else {
        warn!("User {} denied reading submission {}", user.id, submission_id);
        Err(ClassroomError::authorization(ACCESS_DENIED))
    }
}
