use super::SubmissionService;
use crate::access;
use crate::errors::Result;
use crate::models::{
    submissions::{entities::SubmissionFilter, responses::SubmissionResponse},
    users::entities::User,
};

pub async fn list_my_submissions(
    service: &SubmissionService,
    current_user: &User,
) -> Result<Vec<SubmissionResponse>> {
    access::require_student(current_user)?;

    let submissions = service
        .storage()
        .list_submissions(SubmissionFilter {
            student_id: Some(current_user.id),
            ..Default::default()
        })
        .await?;
    Ok(submissions.into_iter().map(SubmissionResponse::from).collect())
}

pub async fn list_assignment_submissions(
    service: &SubmissionService,
    current_user: &User,
    assignment_id: i64,
) -> Result<Vec<SubmissionResponse>> {
    access::require_teacher(current_user)?;
    let (assignment, _) =
        access::owned_assignment(service.storage(), current_user, assignment_id).await?;

    let submissions = service
        .storage()
        .list_submissions(SubmissionFilter {
            assignment_id: Some(assignment.id),
            ..Default::default()
        })
        .await?;
    Ok(submissions.into_iter().map(SubmissionResponse::from).collect())
}
