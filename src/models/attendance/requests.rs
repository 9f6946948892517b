use serde::Deserialize;

// 标记考勤请求，记录保持原始 JSON，逐条校验
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MarkAttendanceRequest {
    pub subject_id: Option<i64>,
    pub date: Option<String>,
    pub attendance_records: Option<Vec<serde_json::Value>>,
}

// 教师查询考勤的日期范围
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AttendanceRangeQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

// 学生查询本人考勤
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MyAttendanceQuery {
    pub subject_id: Option<i64>,
}
