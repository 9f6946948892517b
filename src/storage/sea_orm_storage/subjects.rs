use std::collections::HashMap;

use super::{SeaOrmStorage, is_unique_violation};
use crate::entity::prelude::{AssignmentModel, Assignments, Attendance, Submissions, Users};
use crate::entity::subjects::{ActiveModel, Column, Entity as Subjects, Model};
use crate::entity::{assignments, attendance, submissions, users};
use crate::errors::{ClassroomError, Result};
use crate::models::subjects::entities::{Subject, SubjectDetail};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

impl SeaOrmStorage {
    /// 创建科目
    pub async fn create_subject_impl(&self, teacher_id: i64, name: &str) -> Result<Subject> {
        let model = ActiveModel {
            name: Set(name.to_string()),
            teacher_id: Set(teacher_id),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model.insert(&self.db).await.map_err(|e| {
            if is_unique_violation(&e) {
                ClassroomError::duplicate("Subject already exists!")
            } else {
                ClassroomError::database_operation(format!("创建科目失败: {e}"))
            }
        })?;

        Ok(result.into_subject())
    }

    /// 通过 ID 获取科目
    pub async fn get_subject_by_id_impl(&self, id: i64) -> Result<Option<Subject>> {
        let result = Subjects::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| ClassroomError::database_operation(format!("查询科目失败: {e}")))?;

        Ok(result.map(|m| m.into_subject()))
    }

    /// 通过教师与名称获取科目
    pub async fn get_subject_by_teacher_and_name_impl(
        &self,
        teacher_id: i64,
        name: &str,
    ) -> Result<Option<Subject>> {
        let result = Subjects::find()
            .filter(Column::TeacherId.eq(teacher_id))
            .filter(Column::Name.eq(name))
            .one(&self.db)
            .await
            .map_err(|e| ClassroomError::database_operation(format!("查询科目失败: {e}")))?;

        Ok(result.map(|m| m.into_subject()))
    }

    /// 获取科目详情
    pub async fn get_subject_detail_impl(&self, id: i64) -> Result<Option<SubjectDetail>> {
        let result = Subjects::find_by_id(id)
            .find_also_related(Users)
            .one(&self.db)
            .await
            .map_err(|e| ClassroomError::database_operation(format!("查询科目失败: {e}")))?;

        Ok(result.map(|(subject, teacher)| Self::subject_detail(subject, teacher)))
    }

    /// 列出科目
    pub async fn list_subjects_impl(&self, teacher_id: Option<i64>) -> Result<Vec<SubjectDetail>> {
        let mut select = Subjects::find();
        if let Some(teacher_id) = teacher_id {
            select = select.filter(Column::TeacherId.eq(teacher_id));
        }

        let result = select
            .order_by_asc(Column::Id)
            .find_also_related(Users)
            .all(&self.db)
            .await
            .map_err(|e| ClassroomError::database_operation(format!("查询科目列表失败: {e}")))?;

        Ok(result
            .into_iter()
            .map(|(subject, teacher)| Self::subject_detail(subject, teacher))
            .collect())
    }

    /// 删除科目，连同作业、提交与考勤在一个事务内删除
    ///
    /// 科目不存在时返回 None，否则返回被删除提交的文件句柄，由调用方清理文件。
    /// 事务的第一条语句是写操作，SQLite 下直接取得写锁，避免读快照升级失败。
    pub async fn delete_subject_impl(&self, id: i64) -> Result<Option<Vec<String>>> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| ClassroomError::database_operation(format!("开启事务失败: {e}")))?;

        Attendance::delete_many()
            .filter(attendance::Column::SubjectId.eq(id))
            .exec(&txn)
            .await?;

        let assignment_ids: Vec<i64> = Assignments::find()
            .filter(assignments::Column::SubjectId.eq(id))
            .all(&txn)
            .await?
            .into_iter()
            .map(|a: AssignmentModel| a.id)
            .collect();

        let mut file_paths = Vec::new();
        if !assignment_ids.is_empty() {
            file_paths = Submissions::find()
                .filter(submissions::Column::AssignmentId.is_in(assignment_ids.clone()))
                .all(&txn)
                .await?
                .into_iter()
                .map(|s| s.file_path)
                .collect();
            Submissions::delete_many()
                .filter(submissions::Column::AssignmentId.is_in(assignment_ids))
                .exec(&txn)
                .await?;
        }
        Assignments::delete_many()
            .filter(assignments::Column::SubjectId.eq(id))
            .exec(&txn)
            .await?;
        let result = Subjects::delete_by_id(id).exec(&txn).await?;

        if result.rows_affected == 0 {
            // 科目不存在，前面的删除都是空操作
            txn.rollback()
                .await
                .map_err(|e| ClassroomError::database_operation(format!("回滚事务失败: {e}")))?;
            return Ok(None);
        }

        txn.commit()
            .await
            .map_err(|e| ClassroomError::database_operation(format!("删除科目失败: {e}")))?;

        Ok(Some(file_paths))
    }

    fn subject_detail(subject: Model, teacher: Option<users::Model>) -> SubjectDetail {
        SubjectDetail {
            subject: subject.into_subject(),
            teacher_email: teacher.map(|t| t.email),
        }
    }

    /// 批量查询科目名称
    pub(crate) async fn subject_names<C: ConnectionTrait>(
        conn: &C,
        ids: Vec<i64>,
    ) -> Result<HashMap<i64, String>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let subjects = Subjects::find()
            .filter(Column::Id.is_in(ids))
            .all(conn)
            .await?;
        Ok(subjects.into_iter().map(|s| (s.id, s.name)).collect())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use crate::models::assignments::requests::NewAssignment;
    use crate::models::attendance::entities::{AttendanceFilter, AttendanceMark, AttendanceStatus};
    use crate::models::submissions::entities::SubmissionFilter;
    use crate::testing::{memory_storage, seed_student, seed_teacher, seed_submission};

    #[tokio::test]
    async fn test_same_name_scoped_to_teacher() {
        let storage = memory_storage().await;
        let t1 = seed_teacher(&storage, "t1@example.com").await;
        let t2 = seed_teacher(&storage, "t2@example.com").await;

        storage.create_subject(t1.id, "Math").await.unwrap();
        // 不同教师可以同名
        storage.create_subject(t2.id, "Math").await.unwrap();

        let err = storage.create_subject(t1.id, "Math").await.unwrap_err();
        assert_eq!(err.message(), "Subject already exists!");

        let own = storage.list_subjects(Some(t1.id)).await.unwrap();
        assert_eq!(own.len(), 1);
        assert_eq!(own[0].teacher_email.as_deref(), Some("t1@example.com"));
        assert_eq!(storage.list_subjects(None).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_delete_subject_cascades() {
        let storage = memory_storage().await;
        let teacher = seed_teacher(&storage, "t@example.com").await;
        let student = seed_student(&storage, "s@example.com").await;
        let subject = storage.create_subject(teacher.id, "Physics").await.unwrap();
        let assignment = storage
            .create_assignment(NewAssignment {
                subject_id: subject.id,
                title: "Lab 1".to_string(),
                description: None,
                due_date: chrono::Utc::now() + chrono::Duration::seconds(3600),
            })
            .await
            .unwrap();
        let submission = seed_submission(&storage, assignment.id, student.id).await;
        storage
            .upsert_attendance(
                subject.id,
                NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
                &[AttendanceMark {
                    student_id: student.id,
                    status: AttendanceStatus::Present,
                }],
            )
            .await
            .unwrap();

        let removed = storage.delete_subject(subject.id).await.unwrap();
        assert_eq!(removed, Some(vec![submission.file_path.clone()]));

        assert!(storage.get_subject_by_id(subject.id).await.unwrap().is_none());
        assert!(
            storage
                .get_assignment_by_id(assignment.id)
                .await
                .unwrap()
                .is_none()
        );
        assert!(
            storage
                .list_submissions(SubmissionFilter::default())
                .await
                .unwrap()
                .is_empty()
        );
        assert!(
            storage
                .list_attendance(AttendanceFilter::default())
                .await
                .unwrap()
                .is_empty()
        );
        // 再次删除返回 None
        assert_eq!(storage.delete_subject(subject.id).await.unwrap(), None);
    }
}
