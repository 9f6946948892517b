use chrono::{DateTime, Utc};

// 科目实体
#[derive(Debug, Clone, PartialEq)]
pub struct Subject {
    pub id: i64,
    pub name: String,
    pub teacher_id: i64,
    pub created_at: DateTime<Utc>,
}

// 带教师邮箱的科目
#[derive(Debug, Clone)]
pub struct SubjectDetail {
    pub subject: Subject,
    pub teacher_email: Option<String>,
}
