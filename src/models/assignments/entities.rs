use chrono::{DateTime, Utc};

// 作业实体
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub id: i64,
    pub subject_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub due_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

// 带科目名与提交数的作业
#[derive(Debug, Clone)]
pub struct AssignmentDetail {
    pub assignment: Assignment,
    pub subject_name: Option<String>,
    pub submission_count: u64,
}
