use chrono::{DateTime, Utc};
use serde::Serialize;

use super::entities::SubjectDetail;

#[derive(Debug, Clone, Serialize)]
pub struct SubjectResponse {
    pub id: i64,
    pub name: String,
    pub teacher_id: i64,
    pub teacher_email: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<SubjectDetail> for SubjectResponse {
    fn from(detail: SubjectDetail) -> Self {
        Self {
            id: detail.subject.id,
            name: detail.subject.name,
            teacher_id: detail.subject.teacher_id,
            teacher_email: detail.teacher_email,
            created_at: detail.subject.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SubjectCreatedResponse {
    pub message: String,
    pub subject: SubjectResponse,
}
