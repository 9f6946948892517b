//! 提交存储操作

use std::collections::HashMap;

use super::{SeaOrmStorage, is_unique_violation};
use crate::entity::assignments::{Column as AssignmentColumn, Entity as Assignments};
use crate::entity::submissions::{ActiveModel, Column, Entity as Submissions, Model};
use crate::entity::users::{Column as UserColumn, Entity as Users};
use crate::errors::{ClassroomError, Result};
use crate::models::submissions::{
    entities::{Submission, SubmissionDetail, SubmissionFilter},
    requests::NewSubmission,
};
use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    /// 创建提交
    pub async fn create_submission_impl(&self, req: NewSubmission) -> Result<Submission> {
        let model = ActiveModel {
            assignment_id: Set(req.assignment_id),
            student_id: Set(req.student_id),
            file_path: Set(req.file_path),
            file_name: Set(req.file_name),
            submitted_at: Set(req.submitted_at.timestamp_millis()),
            grade: Set(None),
            feedback: Set(None),
            ..Default::default()
        };

        // 唯一约束是防止重复提交的最终保障
        let result = model.insert(&self.db).await.map_err(|e| {
            if is_unique_violation(&e) {
                ClassroomError::duplicate("You have already submitted this assignment!")
            } else {
                ClassroomError::database_operation(format!("创建提交失败: {e}"))
            }
        })?;

        Ok(result.into_submission())
    }

    /// 通过 ID 获取提交
    pub async fn get_submission_by_id_impl(&self, id: i64) -> Result<Option<Submission>> {
        let result = Submissions::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| ClassroomError::database_operation(format!("查询提交失败: {e}")))?;

        Ok(result.map(|m| m.into_submission()))
    }

    /// 获取学生对某作业的提交
    pub async fn get_student_submission_impl(
        &self,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<Option<Submission>> {
        let result = Submissions::find()
            .filter(Column::AssignmentId.eq(assignment_id))
            .filter(Column::StudentId.eq(student_id))
            .one(&self.db)
            .await
            .map_err(|e| ClassroomError::database_operation(format!("查询提交失败: {e}")))?;

        Ok(result.map(|m| m.into_submission()))
    }

    /// 获取提交详情
    pub async fn get_submission_detail_impl(&self, id: i64) -> Result<Option<SubmissionDetail>> {
        let Some(model) = Submissions::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| ClassroomError::database_operation(format!("查询提交失败: {e}")))?
        else {
            return Ok(None);
        };

        Ok(self.submission_details(vec![model]).await?.pop())
    }

    /// 列出提交（按提交时间倒序）
    pub async fn list_submissions_impl(
        &self,
        filter: SubmissionFilter,
    ) -> Result<Vec<SubmissionDetail>> {
        let mut select = Submissions::find();
        if let Some(assignment_id) = filter.assignment_id {
            select = select.filter(Column::AssignmentId.eq(assignment_id));
        }
        if let Some(student_id) = filter.student_id {
            select = select.filter(Column::StudentId.eq(student_id));
        }

        let models = select
            .order_by_desc(Column::SubmittedAt)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| ClassroomError::database_operation(format!("查询提交列表失败: {e}")))?;

        self.submission_details(models).await
    }

    /// 评分
    pub async fn grade_submission_impl(
        &self,
        id: i64,
        grade: Option<String>,
        feedback: Option<String>,
    ) -> Result<Option<Submission>> {
        let Some(existing) = Submissions::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| ClassroomError::database_operation(format!("查询提交失败: {e}")))?
        else {
            return Ok(None);
        };

        let mut model: ActiveModel = existing.into();
        model.grade = Set(grade);
        model.feedback = Set(feedback);

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| ClassroomError::database_operation(format!("评分失败: {e}")))?;

        Ok(Some(result.into_submission()))
    }

    // 补充学生邮箱与作业截止时间
    async fn submission_details(&self, models: Vec<Model>) -> Result<Vec<SubmissionDetail>> {
        if models.is_empty() {
            return Ok(Vec::new());
        }

        let student_ids: Vec<i64> = models.iter().map(|m| m.student_id).collect();
        let emails: HashMap<i64, String> = Users::find()
            .filter(UserColumn::Id.is_in(student_ids))
            .all(&self.db)
            .await
            .map_err(|e| ClassroomError::database_operation(format!("查询学生失败: {e}")))?
            .into_iter()
            .map(|u| (u.id, u.email))
            .collect();

        let assignment_ids: Vec<i64> = models.iter().map(|m| m.assignment_id).collect();
        let due_dates: HashMap<i64, DateTime<Utc>> = Assignments::find()
            .filter(AssignmentColumn::Id.is_in(assignment_ids))
            .all(&self.db)
            .await
            .map_err(|e| ClassroomError::database_operation(format!("查询作业失败: {e}")))?
            .into_iter()
            .filter_map(|a| DateTime::<Utc>::from_timestamp_millis(a.due_date).map(|d| (a.id, d)))
            .collect();

        Ok(models
            .into_iter()
            .map(|m| SubmissionDetail {
                student_email: emails.get(&m.student_id).cloned(),
                due_date: due_dates.get(&m.assignment_id).copied(),
                submission: m.into_submission(),
            })
            .collect())
    }
}
