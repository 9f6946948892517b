//! 作业存储操作

use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::assignments::{ActiveModel, Column, Entity as Assignments, Model};
use crate::entity::submissions::{Column as SubmissionColumn, Entity as Submissions};
use crate::errors::{ClassroomError, Result};
use crate::models::assignments::{
    entities::{Assignment, AssignmentDetail},
    requests::NewAssignment,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};

impl SeaOrmStorage {
    /// 创建作业
    pub async fn create_assignment_impl(&self, req: NewAssignment) -> Result<Assignment> {
        let model = ActiveModel {
            subject_id: Set(req.subject_id),
            title: Set(req.title),
            description: Set(req.description),
            due_date: Set(req.due_date.timestamp_millis()),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| ClassroomError::database_operation(format!("创建作业失败: {e}")))?;

        Ok(result.into_assignment())
    }

    /// 通过 ID 获取作业
    pub async fn get_assignment_by_id_impl(&self, id: i64) -> Result<Option<Assignment>> {
        let result = Assignments::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| ClassroomError::database_operation(format!("查询作业失败: {e}")))?;

        Ok(result.map(|m| m.into_assignment()))
    }

    /// 获取作业详情
    pub async fn get_assignment_detail_impl(&self, id: i64) -> Result<Option<AssignmentDetail>> {
        let Some(model) = Assignments::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| ClassroomError::database_operation(format!("查询作业失败: {e}")))?
        else {
            return Ok(None);
        };

        Ok(self.assignment_details(vec![model]).await?.pop())
    }

    /// 列出科目下的作业
    pub async fn list_assignments_by_subject_impl(
        &self,
        subject_id: i64,
    ) -> Result<Vec<AssignmentDetail>> {
        let models = Assignments::find()
            .filter(Column::SubjectId.eq(subject_id))
            .order_by_asc(Column::DueDate)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| ClassroomError::database_operation(format!("查询作业列表失败: {e}")))?;

        self.assignment_details(models).await
    }

    // 补充科目名与提交数
    async fn assignment_details(&self, models: Vec<Model>) -> Result<Vec<AssignmentDetail>> {
        if models.is_empty() {
            return Ok(Vec::new());
        }

        let mut subject_ids: Vec<i64> = models.iter().map(|m| m.subject_id).collect();
        subject_ids.sort_unstable();
        subject_ids.dedup();
        let subject_names = Self::subject_names(&self.db, subject_ids).await?;

        let ids: Vec<i64> = models.iter().map(|m| m.id).collect();
        let counts: HashMap<i64, i64> = Submissions::find()
            .select_only()
            .column(SubmissionColumn::AssignmentId)
            .column_as(SubmissionColumn::Id.count(), "submission_count")
            .filter(SubmissionColumn::AssignmentId.is_in(ids))
            .group_by(SubmissionColumn::AssignmentId)
            .into_tuple::<(i64, i64)>()
            .all(&self.db)
            .await
            .map_err(|e| ClassroomError::database_operation(format!("统计提交数失败: {e}")))?
            .into_iter()
            .collect();

        Ok(models
            .into_iter()
            .map(|m| {
                let submission_count = counts.get(&m.id).copied().unwrap_or(0).max(0) as u64;
                let subject_name = subject_names.get(&m.subject_id).cloned();
                AssignmentDetail {
                    assignment: m.into_assignment(),
                    subject_name,
                    submission_count,
                }
            })
            .collect())
    }
}
