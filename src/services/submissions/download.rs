use tracing::warn;

use super::SubmissionService;
use crate::access;
use crate::errors::{ClassroomError, Result};
use crate::models::{submissions::responses::SubmissionDownload, users::entities::User};

pub async fn download_submission(
    service: &SubmissionService,
    current_user: &User,
    submission_id: i64,
) -> Result<SubmissionDownload> {
    let submission =
        access::readable_submission(service.storage(), current_user, submission_id).await?;

    let bytes = service
        .files()
        .retrieve(&submission.file_path)
        .await?
        .ok_or_else(|| {
            warn!(
                "Submission {} references missing file {}",
                submission.id, submission.file_path
            );
            ClassroomError::not_found("File not found!")
        })?;

    Ok(SubmissionDownload {
        file_name: submission.file_name,
        bytes,
    })
}
