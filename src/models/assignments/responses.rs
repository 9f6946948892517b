use chrono::{DateTime, Utc};
use serde::Serialize;

use super::entities::AssignmentDetail;
use crate::models::submissions::responses::SubmissionResponse;

#[derive(Debug, Clone, Serialize)]
pub struct AssignmentResponse {
    pub id: i64,
    pub subject_id: i64,
    pub subject_name: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub due_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub submission_count: u64,
}

impl From<AssignmentDetail> for AssignmentResponse {
    fn from(detail: AssignmentDetail) -> Self {
        let a = detail.assignment;
        Self {
            id: a.id,
            subject_id: a.subject_id,
            subject_name: detail.subject_name,
            title: a.title,
            description: a.description,
            due_date: a.due_date,
            created_at: a.created_at,
            submission_count: detail.submission_count,
        }
    }
}

/// 学生视角的作业，附带本人提交情况
#[derive(Debug, Clone, Serialize)]
pub struct StudentAssignmentResponse {
    #[serde(flatten)]
    pub assignment: AssignmentResponse,
    pub submitted: bool,
    pub my_submission: Option<SubmissionResponse>,
}

/// 作业列表，按角色返回不同结构
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum AssignmentListResponse {
    Teacher(Vec<AssignmentResponse>),
    Student(Vec<StudentAssignmentResponse>),
}

impl AssignmentListResponse {
    pub fn len(&self) -> usize {
        match self {
            Self::Teacher(items) => items.len(),
            Self::Student(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AssignmentCreatedResponse {
    pub message: String,
    pub assignment: AssignmentResponse,
}
