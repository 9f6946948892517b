pub mod download;
pub mod grade;
pub mod list;
pub mod submit;

use std::sync::Arc;

use crate::config::UploadConfig;
use crate::errors::Result;
use crate::models::{
    submissions::{
        requests::{GradeSubmissionRequest, SubmitAssignmentForm},
        responses::{SubmissionDownload, SubmissionMessageResponse, SubmissionResponse},
    },
    users::entities::User,
};
use crate::storage::{FileStore, Storage};

pub struct SubmissionService {
    storage: Arc<dyn Storage>,
    files: Arc<dyn FileStore>,
    upload: UploadConfig,
}

impl SubmissionService {
    pub fn new(storage: Arc<dyn Storage>, files: Arc<dyn FileStore>, upload: UploadConfig) -> Self {
        Self {
            storage,
            files,
            upload,
        }
    }

    pub(crate) fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }

    pub(crate) fn files(&self) -> &Arc<dyn FileStore> {
        &self.files
    }

    pub(crate) fn upload(&self) -> &UploadConfig {
        &self.upload
    }

    // 学生提交作业
    pub async fn submit(
        &self,
        current_user: &User,
        form: SubmitAssignmentForm,
    ) -> Result<SubmissionMessageResponse> {
        submit::submit_assignment(self, current_user, form).await
    }

    // 学生查看本人提交
    pub async fn list_mine(&self, current_user: &User) -> Result<Vec<SubmissionResponse>> {
        list::list_my_submissions(self, current_user).await
    }

    // 教师查看作业下的提交
    pub async fn list_for_assignment(
        &self,
        current_user: &User,
        assignment_id: i64,
    ) -> Result<Vec<SubmissionResponse>> {
        list::list_assignment_submissions(self, current_user, assignment_id).await
    }

    // 评分
    pub async fn grade(
        &self,
        current_user: &User,
        submission_id: i64,
        request: GradeSubmissionRequest,
    ) -> Result<SubmissionMessageResponse> {
        grade::grade_submission(self, current_user, submission_id, request).await
    }

    // 下载提交的文件
    pub async fn download(
        &self,
        current_user: &User,
        submission_id: i64,
    ) -> Result<SubmissionDownload> {
        download::download_submission(self, current_user, submission_id).await
    }
}
