use std::collections::HashMap;

use chrono::{DateTime, Utc};

// 创建作业的表单字段（multipart），原样交给服务层校验
#[derive(Debug, Clone, Default)]
pub struct CreateAssignmentForm {
    pub subject_id: Option<String>,
    pub title: Option<String>,
    pub due_date: Option<String>,
    pub description: Option<String>,
}

impl CreateAssignmentForm {
    pub fn from_fields(mut fields: HashMap<String, String>) -> Self {
        Self {
            subject_id: fields.remove("subject_id"),
            title: fields.remove("title"),
            due_date: fields.remove("due_date"),
            description: fields.remove("description"),
        }
    }
}

// 写入存储层的作业
#[derive(Debug, Clone)]
pub struct NewAssignment {
    pub subject_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub due_date: DateTime<Utc>,
}
