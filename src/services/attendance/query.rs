use std::collections::HashMap;

use super::AttendanceService;
use crate::access;
use crate::errors::Result;
use crate::models::{
    attendance::{
        entities::{AttendanceDetail, AttendanceFilter, AttendanceStatus},
        requests::{AttendanceRangeQuery, MyAttendanceQuery},
        responses::{
            AttendanceResponse, AttendanceStats, StudentAttendanceGroup,
            StudentAttendanceResponse, SubjectAttendanceResponse,
        },
    },
    subjects::entities::SubjectDetail,
    users::entities::User,
};
use crate::utils::parse_iso_date;

/// 按学生分组，保持记录首次出现的顺序
fn group_by_student(records: &[AttendanceDetail]) -> Vec<StudentAttendanceGroup> {
    let mut groups: Vec<StudentAttendanceGroup> = Vec::new();
    let mut index_of: HashMap<i64, usize> = HashMap::new();

    for detail in records {
        let index = *index_of
            .entry(detail.attendance.student_id)
            .or_insert_with(|| {
                groups.push(StudentAttendanceGroup {
                    student: detail.student.clone(),
                    records: Vec::new(),
                    total: 0,
                    present: 0,
                    absent: 0,
                });
                groups.len() - 1
            });

        let group = &mut groups[index];
        group.total += 1;
        match detail.attendance.status {
            AttendanceStatus::Present => group.present += 1,
            AttendanceStatus::Absent => group.absent += 1,
        }
        group.records.push(AttendanceResponse::from(detail));
    }

    groups
}

pub async fn subject_attendance(
    service: &AttendanceService,
    current_user: &User,
    subject_id: i64,
    range: AttendanceRangeQuery,
) -> Result<SubjectAttendanceResponse> {
    access::require_teacher(current_user)?;
    let subject = access::owned_subject(service.storage(), current_user, subject_id).await?;

    // 无法解析的日期不作为筛选条件
    let records = service
        .storage()
        .list_attendance(AttendanceFilter {
            subject_id: Some(subject.id),
            student_id: None,
            start_date: range.start_date.as_deref().and_then(parse_iso_date),
            end_date: range.end_date.as_deref().and_then(parse_iso_date),
        })
        .await?;

    Ok(SubjectAttendanceResponse {
        subject: SubjectDetail {
            subject,
            teacher_email: Some(current_user.email.clone()),
        }
        .into(),
        attendance: group_by_student(&records),
    })
}

pub async fn my_attendance(
    service: &AttendanceService,
    current_user: &User,
    query: MyAttendanceQuery,
) -> Result<StudentAttendanceResponse> {
    access::require_student(current_user)?;

    let records = service
        .storage()
        .list_attendance(AttendanceFilter {
            subject_id: query.subject_id,
            student_id: Some(current_user.id),
            ..Default::default()
        })
        .await?;

    // 只有指定科目时才统计出勤率
    let stats = query
        .subject_id
        .map(|_| AttendanceStats::from_statuses(records.iter().map(|r| r.attendance.status)));

    Ok(StudentAttendanceResponse {
        attendance: records.iter().map(AttendanceResponse::from).collect(),
        stats,
    })
}
