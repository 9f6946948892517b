use tracing::info;

use super::SubjectService;
use crate::access;
use crate::errors::{ClassroomError, Result};
use crate::models::{
    subjects::{requests::CreateSubjectRequest, responses::SubjectCreatedResponse},
    users::entities::User,
};

pub async fn create_subject(
    service: &SubjectService,
    current_user: &User,
    request: CreateSubjectRequest,
) -> Result<SubjectCreatedResponse> {
    access::require_teacher(current_user)?;

    let name = request
        .name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .ok_or_else(|| ClassroomError::validation("Subject name is required!"))?;

    // 同一教师下不能重名，唯一索引兜底并发创建
    let storage = service.storage();
    if storage
        .get_subject_by_teacher_and_name(current_user.id, &name)
        .await?
        .is_some()
    {
        return Err(ClassroomError::duplicate("Subject already exists!"));
    }

    let subject = storage.create_subject(current_user.id, &name).await?;
    info!("Teacher {} created subject {}", current_user.id, subject.id);

    // 响应与列表同源，教师邮箱由联表查询带出
    let detail = storage
        .get_subject_detail(subject.id)
        .await?
        .ok_or_else(|| ClassroomError::not_found(access::SUBJECT_NOT_FOUND))?;

    Ok(SubjectCreatedResponse {
        message: "Subject created successfully!".to_string(),
        subject: detail.into(),
    })
}
