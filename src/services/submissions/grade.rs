use tracing::info;

use super::SubmissionService;
use crate::access;
use crate::errors::{ClassroomError, Result};
use crate::models::{
    submissions::{requests::GradeSubmissionRequest, responses::SubmissionMessageResponse},
    users::entities::User,
};
use crate::utils::validate::validate_grade;

pub async fn grade_submission(
    service: &SubmissionService,
    current_user: &User,
    submission_id: i64,
    request: GradeSubmissionRequest,
) -> Result<SubmissionMessageResponse> {
    access::require_teacher(current_user)?;
    let storage = service.storage();

    // 先判断存在，再判断是否为作业所属科目的教师
    let submission = access::gradable_submission(storage, current_user, submission_id).await?;

    if let Some(grade) = &request.grade {
        validate_grade(grade).map_err(ClassroomError::validation)?;
    }

    // 覆盖成绩与评语，两者都可以置空
    storage
        .grade_submission(submission.id, request.grade, request.feedback)
        .await?
        .ok_or_else(|| ClassroomError::not_found(access::SUBMISSION_NOT_FOUND))?;
    let detail = storage
        .get_submission_detail(submission.id)
        .await?
        .ok_or_else(|| ClassroomError::not_found(access::SUBMISSION_NOT_FOUND))?;
    info!(
        "Teacher {} graded submission {}",
        current_user.id, submission.id
    );

    Ok(SubmissionMessageResponse {
        message: "Submission graded successfully!".to_string(),
        submission: detail.into(),
    })
}
