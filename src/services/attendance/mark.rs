use serde_json::Value;
use tracing::{info, warn};

use super::AttendanceService;
use crate::access;
use crate::errors::{ClassroomError, Result};
use crate::models::{
    attendance::{
        entities::{AttendanceMark, AttendanceStatus},
        requests::MarkAttendanceRequest,
        responses::MarkAttendanceResponse,
    },
    users::entities::User,
};
use crate::utils::parse_iso_date;
use crate::utils::validate::record_student_id;

// 单条记录的结构校验，不访问存储
fn parse_record(record: &Value) -> Option<AttendanceMark> {
    let student_id = record_student_id(record.get("student_id"))?;
    let status = record
        .get("status")
        .and_then(Value::as_str)?
        .parse::<AttendanceStatus>()
        .ok()?;
    Some(AttendanceMark { student_id, status })
}

pub async fn mark_attendance(
    service: &AttendanceService,
    current_user: &User,
    request: MarkAttendanceRequest,
) -> Result<MarkAttendanceResponse> {
    access::require_teacher(current_user)?;

    // 1. 必填字段
    let subject_id = request
        .subject_id
        .ok_or_else(|| ClassroomError::validation("subject_id is required!"))?;
    let date = request
        .date
        .ok_or_else(|| ClassroomError::validation("date is required!"))?;
    let records = request
        .attendance_records
        .ok_or_else(|| ClassroomError::validation("attendance_records is required!"))?;

    // 2. 科目归属与日期
    let storage = service.storage();
    let subject = access::owned_subject(storage, current_user, subject_id).await?;
    let date =
        parse_iso_date(&date).ok_or_else(|| ClassroomError::validation("Invalid date format!"))?;

    // 3. 逐条校验，无效记录跳过并记录原因
    let mut marks = Vec::with_capacity(records.len());
    let mut errors = Vec::new();
    for record in &records {
        let Some(mark) = parse_record(record) else {
            errors.push(format!("Invalid record: {record}"));
            continue;
        };
        match storage.get_user_by_id(mark.student_id).await? {
            Some(user) if user.is_student() => marks.push(mark),
            _ => errors.push(format!("Student {} not found", mark.student_id)),
        }
    }

    // 4. 有效记录在同一事务内写入
    let records_marked = storage.upsert_attendance(subject.id, date, &marks).await?;
    if !errors.is_empty() {
        warn!(
            "Attendance for subject {} on {}: {} record(s) rejected",
            subject.id,
            date,
            errors.len()
        );
    }
    info!(
        "Teacher {} marked {} attendance record(s) for subject {} on {}",
        current_user.id, records_marked, subject.id, date
    );

    Ok(MarkAttendanceResponse {
        message: "Attendance marked successfully!".to_string(),
        records_marked,
        errors: (!errors.is_empty()).then_some(errors),
    })
}
