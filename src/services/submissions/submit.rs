use chrono::{DateTime, Utc};
use tracing::{info, warn};

use super::SubmissionService;
use crate::access;
use crate::errors::{ClassroomError, Result};
use crate::models::{
    submissions::{
        entities::SubmissionDetail,
        requests::{NewSubmission, SubmitAssignmentForm},
        responses::SubmissionMessageResponse,
    },
    users::entities::User,
};
use crate::utils::validate::parse_id;
use crate::utils::{file_extension, secure_filename, validate_magic_bytes};

/// 存储文件名：{学生ID}_{作业ID}_{时间戳}_{清洗后的文件名}
pub(crate) fn storage_name(
    student_id: i64,
    assignment_id: i64,
    at: DateTime<Utc>,
    file_name: &str,
) -> String {
    format!(
        "{student_id}_{assignment_id}_{}.{:06}_{file_name}",
        at.timestamp(),
        at.timestamp_subsec_micros()
    )
}

pub async fn submit_assignment(
    service: &SubmissionService,
    current_user: &User,
    form: SubmitAssignmentForm,
) -> Result<SubmissionMessageResponse> {
    access::require_student(current_user)?;

    // 1. 文件与作业 ID
    let file = form
        .file
        .ok_or_else(|| ClassroomError::validation("No file provided!"))?;
    if file.file_name.is_empty() {
        return Err(ClassroomError::validation("No file selected!"));
    }
    let assignment_id = form
        .assignment_id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| ClassroomError::validation("Assignment ID is required!"))?;
    let assignment_id = parse_id(&assignment_id)
        .ok_or_else(|| ClassroomError::validation("Invalid assignment ID!"))?;

    // 2. 作业存在
    let storage = service.storage();
    let assignment = storage
        .get_assignment_by_id(assignment_id)
        .await?
        .ok_or_else(|| ClassroomError::not_found(access::ASSIGNMENT_NOT_FOUND))?;

    // 3. 未提交过（并发时由唯一索引兜底）
    if storage
        .get_student_submission(assignment.id, current_user.id)
        .await?
        .is_some()
    {
        return Err(ClassroomError::duplicate(
            "You have already submitted this assignment!",
        ));
    }

    // 4. 文件类型与大小
    let upload = service.upload();
    let extension = file_extension(&file.file_name)
        .filter(|ext| upload.is_allowed_extension(ext))
        .ok_or_else(|| {
            ClassroomError::validation(format!(
                "File type not allowed! Allowed types: {}",
                upload.allowed_extensions.join(", ")
            ))
        })?;
    if file.bytes.len() > upload.max_size {
        return Err(ClassroomError::validation(format!(
            "File too large! Maximum size is {} bytes",
            upload.max_size
        )));
    }
    if upload.verify_magic_bytes && !validate_magic_bytes(&file.bytes, &extension) {
        return Err(ClassroomError::validation(
            "File content does not match its extension!",
        ));
    }

    // 5. 保存文件后写入记录，写入失败时删除文件
    let file_name = secure_filename(&file.file_name);
    let now = Utc::now();
    let handle = service
        .files()
        .store(
            &file.bytes,
            &storage_name(current_user.id, assignment.id, now, &file_name),
        )
        .await?;

    let created = storage
        .create_submission(NewSubmission {
            assignment_id: assignment.id,
            student_id: current_user.id,
            file_path: handle.clone(),
            file_name,
            submitted_at: now,
        })
        .await;
    let submission = match created {
        Ok(submission) => submission,
        Err(e) => {
            if let Err(remove_err) = service.files().remove(&handle).await {
                warn!("Failed to remove orphaned upload {}: {}", handle, remove_err);
            }
            return Err(e);
        }
    };
    info!(
        "Student {} submitted assignment {} as {}",
        current_user.id, assignment.id, submission.file_path
    );

    Ok(SubmissionMessageResponse {
        message: "Assignment submitted successfully!".to_string(),
        submission: SubmissionDetail {
            submission,
            student_email: Some(current_user.email.clone()),
            due_date: Some(assignment.due_date),
        }
        .into(),
    })
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use chrono::TimeZone;

    use super::*;
    use crate::models::assignments::requests::NewAssignment;
    use crate::models::submissions::{entities::SubmissionFilter, requests::UploadedFile};
    use crate::storage::FileStore;
    use crate::testing::{TestContext, pdf_bytes, seed_student, seed_teacher, test_context};

    async fn setup(due_offset_secs: i64) -> (TestContext, User, i64) {
        let ctx = test_context().await;
        let teacher = seed_teacher(&ctx.storage, "t@example.com").await;
        let student = seed_student(&ctx.storage, "s@example.com").await;
        let subject = ctx.storage.create_subject(teacher.id, "CS").await.unwrap();
        let assignment = ctx
            .storage
            .create_assignment(NewAssignment {
                subject_id: subject.id,
                title: "Project".to_string(),
                description: None,
                due_date: Utc::now() + chrono::Duration::seconds(due_offset_secs),
            })
            .await
            .unwrap();
        (ctx, student, assignment.id)
    }

    fn form(assignment_id: i64, name: &str, bytes: Vec<u8>) -> SubmitAssignmentForm {
        SubmitAssignmentForm {
            assignment_id: Some(assignment_id.to_string()),
            file: Some(UploadedFile {
                file_name: name.to_string(),
                bytes,
            }),
        }
    }

    #[test]
    fn test_storage_name_format() {
        let at = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        assert_eq!(
            storage_name(3, 7, at, "report.pdf"),
            format!("3_7_{}.000000_report.pdf", at.timestamp())
        );
    }

    #[tokio::test]
    async fn test_submit_stores_file_and_flags_late() {
        let (ctx, student, assignment_id) = setup(-3600).await;
        let submissions = &ctx.services.submissions;

        let resp = submissions
            .submit(&student, form(assignment_id, "../My Report.pdf", pdf_bytes()))
            .await
            .unwrap();
        assert_eq!(resp.message, "Assignment submitted successfully!");
        assert_eq!(resp.submission.filename, "My_Report.pdf");
        assert!(resp.submission.is_late);
        assert!(resp.submission.file_path.starts_with(&format!("{}_{}_", student.id, assignment_id)));

        let stored = ctx.file_store.retrieve(&resp.submission.file_path).await.unwrap();
        assert_eq!(stored, Some(pdf_bytes()));
    }

    #[tokio::test]
    async fn test_submit_rejections() {
        let (ctx, student, assignment_id) = setup(3600).await;
        let submissions = &ctx.services.submissions;

        let no_file = SubmitAssignmentForm {
            assignment_id: Some(assignment_id.to_string()),
            file: None,
        };
        assert_eq!(
            submissions.submit(&student, no_file).await.unwrap_err().message(),
            "No file provided!"
        );
        assert_eq!(
            submissions
                .submit(&student, form(assignment_id, "", pdf_bytes()))
                .await
                .unwrap_err()
                .message(),
            "No file selected!"
        );

        let mut no_id = form(assignment_id, "a.pdf", pdf_bytes());
        no_id.assignment_id = None;
        assert_eq!(
            submissions.submit(&student, no_id).await.unwrap_err().message(),
            "Assignment ID is required!"
        );

        let err = submissions
            .submit(&student, form(9999, "a.pdf", pdf_bytes()))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);

        let err = submissions
            .submit(&student, form(assignment_id, "virus.exe", vec![0x4d, 0x5a]))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert!(err.message().starts_with("File type not allowed! Allowed types: pdf"));

        let err = submissions
            .submit(&student, form(assignment_id, "fake.pdf", b"not a pdf".to_vec()))
            .await
            .unwrap_err();
        assert_eq!(err.message(), "File content does not match its extension!");

        // 教师不能提交
        let teacher = ctx.storage.get_user_by_email("t@example.com").await.unwrap().unwrap();
        let err = submissions
            .submit(&teacher, form(assignment_id, "a.pdf", pdf_bytes()))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_second_submission_rejected() {
        let (ctx, student, assignment_id) = setup(3600).await;
        let submissions = &ctx.services.submissions;

        submissions
            .submit(&student, form(assignment_id, "a.pdf", pdf_bytes()))
            .await
            .unwrap();
        let err = submissions
            .submit(&student, form(assignment_id, "b.pdf", pdf_bytes()))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.message(), "You have already submitted this assignment!");
    }

    #[tokio::test]
    async fn test_concurrent_submissions_keep_one() {
        let (ctx, student, assignment_id) = setup(3600).await;
        let submissions = &ctx.services.submissions;

        let (first, second) = tokio::join!(
            submissions.submit(&student, form(assignment_id, "a.pdf", pdf_bytes())),
            submissions.submit(&student, form(assignment_id, "b.pdf", pdf_bytes())),
        );
        let results = [first, second];
        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        let err = results.iter().find_map(|r| r.as_ref().err()).unwrap();
        assert_eq!(err.message(), "You have already submitted this assignment!");

        let rows = ctx
            .storage
            .list_submissions(SubmissionFilter {
                assignment_id: Some(assignment_id),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
    }
}
