pub mod create;
pub mod delete;
pub mod list;

use std::sync::Arc;

use crate::access::Actor;
use crate::errors::Result;
use crate::models::{
    MessageResponse,
    subjects::{
        requests::CreateSubjectRequest,
        responses::{SubjectCreatedResponse, SubjectResponse},
    },
    users::entities::User,
};
use crate::storage::{FileStore, Storage};

pub struct SubjectService {
    storage: Arc<dyn Storage>,
    files: Arc<dyn FileStore>,
}

impl SubjectService {
    pub fn new(storage: Arc<dyn Storage>, files: Arc<dyn FileStore>) -> Self {
        Self { storage, files }
    }

    pub(crate) fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }

    pub(crate) fn files(&self) -> &Arc<dyn FileStore> {
        &self.files
    }

    // 创建科目
    pub async fn create(
        &self,
        current_user: &User,
        request: CreateSubjectRequest,
    ) -> Result<SubjectCreatedResponse> {
        create::create_subject(self, current_user, request).await
    }

    // 列出科目：教师只看自己的，学生看全部
    pub async fn list(&self, actor: &Actor) -> Result<Vec<SubjectResponse>> {
        list::list_subjects(self, actor).await
    }

    // 删除科目，连同已提交的文件
    pub async fn delete(&self, current_user: &User, subject_id: i64) -> Result<MessageResponse> {
        delete::delete_subject(self, current_user, subject_id).await
    }
}
