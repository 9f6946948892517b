use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::models::users::entities::User;

// 考勤状态
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum AttendanceStatus {
    Present,
    Absent,
}

impl AttendanceStatus {
    pub const PRESENT: &'static str = "PRESENT";
    pub const ABSENT: &'static str = "ABSENT";
}

impl std::fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttendanceStatus::Present => write!(f, "{}", Self::PRESENT),
            AttendanceStatus::Absent => write!(f, "{}", Self::ABSENT),
        }
    }
}

impl std::str::FromStr for AttendanceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            Self::PRESENT => Ok(AttendanceStatus::Present),
            Self::ABSENT => Ok(AttendanceStatus::Absent),
            _ => Err(format!("Invalid attendance status: {s}")),
        }
    }
}

// 考勤实体
#[derive(Debug, Clone, PartialEq)]
pub struct Attendance {
    pub id: i64,
    pub subject_id: i64,
    pub student_id: i64,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    pub marked_at: DateTime<Utc>,
}

// 带科目名与学生信息的考勤
#[derive(Debug, Clone)]
pub struct AttendanceDetail {
    pub attendance: Attendance,
    pub subject_name: Option<String>,
    pub student: Option<User>,
}

// 一条待写入的考勤
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttendanceMark {
    pub student_id: i64,
    pub status: AttendanceStatus,
}

// 考勤查询条件
#[derive(Debug, Clone, Default)]
pub struct AttendanceFilter {
    pub subject_id: Option<i64>,
    pub student_id: Option<i64>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}
