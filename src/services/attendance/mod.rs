pub mod mark;
pub mod query;

use std::sync::Arc;

use crate::errors::Result;
use crate::models::{
    attendance::{
        requests::{AttendanceRangeQuery, MarkAttendanceRequest, MyAttendanceQuery},
        responses::{
            MarkAttendanceResponse, StudentAttendanceResponse, SubjectAttendanceResponse,
        },
    },
    users::entities::User,
};
use crate::storage::Storage;

pub struct AttendanceService {
    storage: Arc<dyn Storage>,
}

impl AttendanceService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub(crate) fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }

    // 批量标记考勤
    pub async fn mark(
        &self,
        current_user: &User,
        request: MarkAttendanceRequest,
    ) -> Result<MarkAttendanceResponse> {
        mark::mark_attendance(self, current_user, request).await
    }

    // 教师查询科目考勤
    pub async fn for_subject(
        &self,
        current_user: &User,
        subject_id: i64,
        range: AttendanceRangeQuery,
    ) -> Result<SubjectAttendanceResponse> {
        query::subject_attendance(self, current_user, subject_id, range).await
    }

    // 学生查询本人考勤
    pub async fn for_student(
        &self,
        current_user: &User,
        query: MyAttendanceQuery,
    ) -> Result<StudentAttendanceResponse> {
        query::my_attendance(self, current_user, query).await
    }
}
