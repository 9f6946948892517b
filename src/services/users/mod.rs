pub mod list;

use std::sync::Arc;

use crate::errors::Result;
use crate::models::users::entities::User;
use crate::storage::Storage;

pub struct UserService {
    storage: Arc<dyn Storage>,
}

impl UserService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub(crate) fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }

    // 列出所有启用的学生（用于考勤）
    pub async fn list_students(&self, current_user: &User) -> Result<Vec<User>> {
        list::list_students(self, current_user).await
    }
}
