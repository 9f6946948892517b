use tracing::{info, warn};

use super::SubjectService;
use crate::access;
use crate::errors::{ClassroomError, Result};
use crate::models::{MessageResponse, users::entities::User};

pub async fn delete_subject(
    service: &SubjectService,
    current_user: &User,
    subject_id: i64,
) -> Result<MessageResponse> {
    access::require_teacher(current_user)?;
    let subject = access::owned_subject(service.storage(), current_user, subject_id).await?;

    let Some(file_paths) = service.storage().delete_subject(subject.id).await? else {
        return Err(ClassroomError::not_found(access::SUBJECT_NOT_FOUND));
    };
    info!(
        "Teacher {} deleted subject {} ({} submission file(s))",
        current_user.id,
        subject.id,
        file_paths.len()
    );

    // 记录已删除，文件清理失败只记日志
    for handle in &file_paths {
        if let Err(e) = service.files().remove(handle).await {
            warn!("Failed to remove upload {} of deleted subject {}: {}", handle, subject.id, e);
        }
    }

    Ok(MessageResponse::new("Subject deleted successfully!"))
}
