use std::sync::Arc;

use chrono::NaiveDate;

use crate::config::DatabaseConfig;
use crate::errors::Result;
use crate::models::{
    assignments::{
        entities::{Assignment, AssignmentDetail},
        requests::NewAssignment,
    },
    attendance::entities::{AttendanceDetail, AttendanceFilter, AttendanceMark},
    subjects::entities::{Subject, SubjectDetail},
    submissions::{
        entities::{Submission, SubmissionDetail, SubmissionFilter},
        requests::NewSubmission,
    },
    users::{entities::User, requests::CreateUserRequest},
};

pub mod file_store;
pub mod sea_orm_storage;

pub use file_store::{FileStore, LocalFileStore};

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户管理方法
    // 创建用户，邮箱重复时返回 Duplicate
    async fn create_user(&self, user: CreateUserRequest) -> Result<User>;
    // 通过ID获取用户信息
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    // 通过邮箱获取用户信息
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    // 列出所有启用的学生
    async fn list_active_students(&self) -> Result<Vec<User>>;
    // 启用/停用用户
    async fn set_user_active(&self, id: i64, active: bool) -> Result<bool>;

    /// 科目管理方法
    // 创建科目，同一教师下重名时返回 Duplicate
    async fn create_subject(&self, teacher_id: i64, name: &str) -> Result<Subject>;
    // 通过ID获取科目
    async fn get_subject_by_id(&self, id: i64) -> Result<Option<Subject>>;
    // 通过教师与名称获取科目
    async fn get_subject_by_teacher_and_name(
        &self,
        teacher_id: i64,
        name: &str,
    ) -> Result<Option<Subject>>;
    // 获取科目详情（含教师邮箱）
    async fn get_subject_detail(&self, id: i64) -> Result<Option<SubjectDetail>>;
    // 列出科目，可按教师筛选
    async fn list_subjects(&self, teacher_id: Option<i64>) -> Result<Vec<SubjectDetail>>;
    // 删除科目及其作业、提交、考勤，返回被删除提交的文件句柄；科目不存在时返回 None
    async fn delete_subject(&self, id: i64) -> Result<Option<Vec<String>>>;

    /// 作业管理方法
    // 创建作业
    async fn create_assignment(&self, assignment: NewAssignment) -> Result<Assignment>;
    // 通过ID获取作业
    async fn get_assignment_by_id(&self, id: i64) -> Result<Option<Assignment>>;
    // 获取作业详情（含科目名与提交数）
    async fn get_assignment_detail(&self, id: i64) -> Result<Option<AssignmentDetail>>;
    // 列出科目下的作业
    async fn list_assignments_by_subject(&self, subject_id: i64) -> Result<Vec<AssignmentDetail>>;

    /// 提交管理方法
    // 创建提交，同一学生重复提交时返回 Duplicate
    async fn create_submission(&self, submission: NewSubmission) -> Result<Submission>;
    // 通过ID获取提交
    async fn get_submission_by_id(&self, id: i64) -> Result<Option<Submission>>;
    // 获取学生对某作业的提交
    async fn get_student_submission(
        &self,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<Option<Submission>>;
    // 获取提交详情
    async fn get_submission_detail(&self, id: i64) -> Result<Option<SubmissionDetail>>;
    // 列出提交，按提交时间倒序
    async fn list_submissions(&self, filter: SubmissionFilter) -> Result<Vec<SubmissionDetail>>;
    // 评分，覆盖已有成绩与评语
    async fn grade_submission(
        &self,
        id: i64,
        grade: Option<String>,
        feedback: Option<String>,
    ) -> Result<Option<Submission>>;

    /// 考勤管理方法
    // 批量写入考勤（存在则更新状态），单个事务内完成
    async fn upsert_attendance(
        &self,
        subject_id: i64,
        date: NaiveDate,
        marks: &[AttendanceMark],
    ) -> Result<usize>;
    // 查询考勤，按日期倒序
    async fn list_attendance(&self, filter: AttendanceFilter) -> Result<Vec<AttendanceDetail>>;
}

pub async fn create_storage(config: &DatabaseConfig) -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::connect(config).await?;
    Ok(Arc::new(storage))
}
