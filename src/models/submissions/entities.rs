use chrono::{DateTime, Utc};

// 提交实体
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub id: i64,
    pub assignment_id: i64,
    pub student_id: i64,
    // 文件存储句柄
    pub file_path: String,
    // 清洗后的原始文件名
    pub file_name: String,
    pub submitted_at: DateTime<Utc>,
    pub grade: Option<String>,
    pub feedback: Option<String>,
}

impl Submission {
    /// 严格晚于截止时间才算迟交
    pub fn is_late(&self, due_date: DateTime<Utc>) -> bool {
        self.submitted_at > due_date
    }
}

// 带学生邮箱与截止时间的提交
#[derive(Debug, Clone)]
pub struct SubmissionDetail {
    pub submission: Submission,
    pub student_email: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
}

// 提交列表筛选条件
#[derive(Debug, Clone, Default)]
pub struct SubmissionFilter {
    pub assignment_id: Option<i64>,
    pub student_id: Option<i64>,
}
