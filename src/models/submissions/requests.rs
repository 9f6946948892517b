use chrono::{DateTime, Utc};
use serde::Deserialize;

// 上传的文件
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

// 提交作业的表单（multipart）
#[derive(Debug, Clone, Default)]
pub struct SubmitAssignmentForm {
    pub assignment_id: Option<String>,
    pub file: Option<UploadedFile>,
}

// 评分请求，两个字段均可置空
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GradeSubmissionRequest {
    #[serde(default)]
    pub grade: Option<String>,
    #[serde(default)]
    pub feedback: Option<String>,
}

// 写入存储层的提交
#[derive(Debug, Clone)]
pub struct NewSubmission {
    pub assignment_id: i64,
    pub student_id: i64,
    pub file_path: String,
    pub file_name: String,
    pub submitted_at: DateTime<Utc>,
}
