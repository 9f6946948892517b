use chrono::{DateTime, Utc};
use serde::Serialize;

use super::entities::SubmissionDetail;

#[derive(Debug, Clone, Serialize)]
pub struct SubmissionResponse {
    pub id: i64,
    pub assignment_id: i64,
    pub student_id: i64,
    pub student_email: Option<String>,
    pub file_path: String,
    pub filename: String,
    pub submitted_at: DateTime<Utc>,
    pub grade: Option<String>,
    pub feedback: Option<String>,
    pub is_late: bool,
}

impl From<SubmissionDetail> for SubmissionResponse {
    fn from(detail: SubmissionDetail) -> Self {
        let is_late = detail
            .due_date
            .map(|due| detail.submission.is_late(due))
            .unwrap_or(false);
        let s = detail.submission;
        Self {
            id: s.id,
            assignment_id: s.assignment_id,
            student_id: s.student_id,
            student_email: detail.student_email,
            file_path: s.file_path,
            filename: s.file_name,
            submitted_at: s.submitted_at,
            grade: s.grade,
            feedback: s.feedback,
            is_late,
        }
    }
}

// 提交/评分成功响应
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionMessageResponse {
    pub message: String,
    pub submission: SubmissionResponse,
}

// 下载内容
#[derive(Debug, Clone)]
pub struct SubmissionDownload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}
