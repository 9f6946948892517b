use tracing::info;

use super::AssignmentService;
use crate::access;
use crate::errors::{ClassroomError, Result};
use crate::models::{
    assignments::{
        requests::{CreateAssignmentForm, NewAssignment},
        responses::AssignmentCreatedResponse,
    },
    users::entities::User,
};
use crate::utils::parse_iso_datetime;
use crate::utils::validate::{parse_id, required_field};

pub async fn create_assignment(
    service: &AssignmentService,
    current_user: &User,
    form: CreateAssignmentForm,
) -> Result<AssignmentCreatedResponse> {
    access::require_teacher(current_user)?;

    // 1. 必填字段
    let subject_id = required_field(form.subject_id, "subject_id")?;
    let title = required_field(form.title, "title")?;
    let due_date = required_field(form.due_date, "due_date")?;

    // 2. 科目存在且属于当前教师；无法解析的 ID 同样视为不存在
    let subject_id = parse_id(&subject_id)
        .ok_or_else(|| ClassroomError::not_found(access::SUBJECT_NOT_FOUND))?;
    let subject = access::owned_subject(service.storage(), current_user, subject_id).await?;

    // 3. 截止时间
    let due_date = parse_iso_datetime(&due_date)
        .ok_or_else(|| ClassroomError::validation("Invalid due date format!"))?;

    let assignment = service
        .storage()
        .create_assignment(NewAssignment {
            subject_id: subject.id,
            title: title.trim().to_string(),
            description: Some(form.description.unwrap_or_default()),
            due_date,
        })
        .await?;
    info!(
        "Teacher {} created assignment {} in subject {}",
        current_user.id, assignment.id, subject.id
    );

    let detail = service
        .storage()
        .get_assignment_detail(assignment.id)
        .await?
        .ok_or_else(|| ClassroomError::not_found(access::ASSIGNMENT_NOT_FOUND))?;

    Ok(AssignmentCreatedResponse {
        message: "Assignment created successfully!".to_string(),
        assignment: detail.into(),
    })
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;

    use crate::models::assignments::requests::CreateAssignmentForm;
    use crate::testing::{seed_teacher, test_context};

    fn form(subject_id: i64, due_date: &str) -> CreateAssignmentForm {
        CreateAssignmentForm {
            subject_id: Some(subject_id.to_string()),
            title: Some("Essay".to_string()),
            due_date: Some(due_date.to_string()),
            description: None,
        }
    }

    #[tokio::test]
    async fn test_other_teacher_cannot_create() {
        let ctx = test_context().await;
        let t1 = seed_teacher(&ctx.storage, "t1@example.com").await;
        let t2 = seed_teacher(&ctx.storage, "t2@example.com").await;
        let subject = ctx.storage.create_subject(t1.id, "English").await.unwrap();
        let assignments = &ctx.services.assignments;

        let err = assignments
            .create(&t2, form(subject.id, "2025-03-01T23:59:00"))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.message(), "Subject not found or access denied!");

        let created = assignments
            .create(&t1, form(subject.id, "2025-03-01T23:59:00"))
            .await
            .unwrap();
        assert_eq!(created.message, "Assignment created successfully!");
        assert_eq!(created.assignment.subject_name.as_deref(), Some("English"));
        assert_eq!(created.assignment.description.as_deref(), Some(""));
        assert_eq!(created.assignment.submission_count, 0);
        assert_eq!(created.assignment.subject_id, subject.id);
        assert_eq!(
            created.assignment.due_date,
            chrono::NaiveDate::from_ymd_opt(2025, 3, 1)
                .and_then(|d| d.and_hms_opt(23, 59, 0))
                .unwrap()
                .and_utc()
        );
    }

    #[tokio::test]
    async fn test_field_and_date_validation() {
        let ctx = test_context().await;
        let teacher = seed_teacher(&ctx.storage, "t@example.com").await;
        let subject = ctx.storage.create_subject(teacher.id, "Music").await.unwrap();
        let assignments = &ctx.services.assignments;

        let mut missing = form(subject.id, "2025-03-01");
        missing.title = None;
        assert_eq!(
            assignments.create(&teacher, missing).await.unwrap_err().message(),
            "title is required!"
        );

        let err = assignments
            .create(&teacher, form(subject.id, "next friday"))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.message(), "Invalid due date format!");

        // 科目不存在时仍是 404 而不是 500
        let err = assignments
            .create(&teacher, form(9999, "2025-03-01"))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }
}
