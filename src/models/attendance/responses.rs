use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use super::entities::{AttendanceDetail, AttendanceStatus};
use crate::models::subjects::responses::SubjectResponse;
use crate::models::users::entities::User;

#[derive(Debug, Clone, Serialize)]
pub struct AttendanceResponse {
    pub id: i64,
    pub subject_id: i64,
    pub subject_name: Option<String>,
    pub student_id: i64,
    pub student_email: Option<String>,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    pub marked_at: DateTime<Utc>,
}

impl From<&AttendanceDetail> for AttendanceResponse {
    fn from(detail: &AttendanceDetail) -> Self {
        let a = &detail.attendance;
        Self {
            id: a.id,
            subject_id: a.subject_id,
            subject_name: detail.subject_name.clone(),
            student_id: a.student_id,
            student_email: detail.student.as_ref().map(|u| u.email.clone()),
            date: a.date,
            status: a.status,
            marked_at: a.marked_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MarkAttendanceResponse {
    pub message: String,
    pub records_marked: usize,
    pub errors: Option<Vec<String>>,
}

/// 出勤统计
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct AttendanceStats {
    pub total: usize,
    pub present: usize,
    pub absent: usize,
    pub percentage: f64,
}

impl AttendanceStats {
    pub fn from_statuses<I>(statuses: I) -> Self
    where
        I: IntoIterator<Item = AttendanceStatus>,
    {
        let (mut total, mut present) = (0usize, 0usize);
        for status in statuses {
            total += 1;
            if status == AttendanceStatus::Present {
                present += 1;
            }
        }

        // 没有记录时出勤率为 0
        let percentage = if total > 0 {
            let raw = present as f64 / total as f64 * 100.0;
            (raw * 100.0).round() / 100.0
        } else {
            0.0
        };

        Self {
            total,
            present,
            absent: total - present,
            percentage,
        }
    }
}

// 学生本人考勤
#[derive(Debug, Clone, Serialize)]
pub struct StudentAttendanceResponse {
    pub attendance: Vec<AttendanceResponse>,
    pub stats: Option<AttendanceStats>,
}

// 教师视角下按学生分组的考勤
#[derive(Debug, Clone, Serialize)]
pub struct StudentAttendanceGroup {
    pub student: Option<User>,
    pub records: Vec<AttendanceResponse>,
    pub total: usize,
    pub present: usize,
    pub absent: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubjectAttendanceResponse {
    pub subject: SubjectResponse,
    pub attendance: Vec<StudentAttendanceGroup>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_without_records() {
        let stats = AttendanceStats::from_statuses(Vec::new());
        assert_eq!(stats.total, 0);
        assert_eq!(stats.absent, 0);
        assert_eq!(stats.percentage, 0.0);
    }

    #[test]
    fn test_stats_three_of_four() {
        use AttendanceStatus::*;
        let stats = AttendanceStats::from_statuses([Present, Absent, Present, Present]);
        assert_eq!(stats.total, 4);
        assert_eq!(stats.present, 3);
        assert_eq!(stats.absent, 1);
        assert_eq!(stats.percentage, 75.0);
    }

    #[test]
    fn test_stats_rounds_to_two_decimals() {
        use AttendanceStatus::*;
        let stats = AttendanceStats::from_statuses([Present, Absent, Absent]);
        assert_eq!(stats.percentage, 33.33);
    }

    #[test]
    fn test_status_wire_format() {
        assert_eq!(
            serde_json::to_value(AttendanceStatus::Present).unwrap(),
            serde_json::json!("PRESENT")
        );
        assert_eq!("ABSENT".parse::<AttendanceStatus>(), Ok(AttendanceStatus::Absent));
        assert!("present".parse::<AttendanceStatus>().is_err());
    }
}
