pub mod create;
pub mod list;

use std::sync::Arc;

use crate::access::Actor;
use crate::errors::Result;
use crate::models::{
    assignments::{
        requests::CreateAssignmentForm,
        responses::{AssignmentCreatedResponse, AssignmentListResponse},
    },
    users::entities::User,
};
use crate::storage::Storage;

pub struct AssignmentService {
    storage: Arc<dyn Storage>,
}

impl AssignmentService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub(crate) fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }

    // 创建作业
    pub async fn create(
        &self,
        current_user: &User,
        form: CreateAssignmentForm,
    ) -> Result<AssignmentCreatedResponse> {
        create::create_assignment(self, current_user, form).await
    }

    // 列出科目下的作业，按角色返回不同视图
    pub async fn list(&self, actor: &Actor, subject_id: i64) -> Result<AssignmentListResponse> {
        list::list_assignments(self, actor, subject_id).await
    }
}
