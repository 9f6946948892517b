//! 考勤存储操作

use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::attendance::{ActiveModel, Column, Entity as Attendance};
use crate::entity::users::{Column as UserColumn, Entity as Users};
use crate::errors::{ClassroomError, Result};
use crate::models::attendance::entities::{AttendanceDetail, AttendanceFilter, AttendanceMark};
use crate::models::users::entities::User;
use chrono::NaiveDate;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait};

impl SeaOrmStorage {
    /// 批量写入考勤
    ///
    /// 同一 (科目, 学生, 日期) 已有记录时更新状态，否则插入。
    /// 每条都是 `INSERT .. ON CONFLICT DO UPDATE`，事务的第一条语句即为写操作。
    /// 整批在一个事务内提交，失败时全部回滚。
    pub async fn upsert_attendance_impl(
        &self,
        subject_id: i64,
        date: NaiveDate,
        marks: &[AttendanceMark],
    ) -> Result<usize> {
        if marks.is_empty() {
            return Ok(0);
        }

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| ClassroomError::database_operation(format!("开启事务失败: {e}")))?;
        let now = chrono::Utc::now().timestamp();

        for mark in marks {
            let model = ActiveModel {
                subject_id: Set(subject_id),
                student_id: Set(mark.student_id),
                date: Set(date),
                status: Set(mark.status.to_string()),
                marked_at: Set(now),
                ..Default::default()
            };
            Attendance::insert(model)
                .on_conflict(
                    OnConflict::columns([Column::SubjectId, Column::StudentId, Column::Date])
                        .update_columns([Column::Status, Column::MarkedAt])
                        .to_owned(),
                )
                .exec_without_returning(&txn)
                .await
                .map_err(|e| ClassroomError::database_operation(format!("写入考勤失败: {e}")))?;
        }

        txn.commit()
            .await
            .map_err(|e| ClassroomError::database_operation(format!("提交考勤事务失败: {e}")))?;

        Ok(marks.len())
    }

    /// 查询考勤（按日期倒序）
    pub async fn list_attendance_impl(
        &self,
        filter: AttendanceFilter,
    ) -> Result<Vec<AttendanceDetail>> {
        let mut select = Attendance::find();
        if let Some(subject_id) = filter.subject_id {
            select = select.filter(Column::SubjectId.eq(subject_id));
        }
        if let Some(student_id) = filter.student_id {
            select = select.filter(Column::StudentId.eq(student_id));
        }
        if let Some(start) = filter.start_date {
            select = select.filter(Column::Date.gte(start));
        }
        if let Some(end) = filter.end_date {
            select = select.filter(Column::Date.lte(end));
        }

        let models = select
            .order_by_desc(Column::Date)
            .order_by_asc(Column::StudentId)
            .all(&self.db)
            .await
            .map_err(|e| ClassroomError::database_operation(format!("查询考勤失败: {e}")))?;

        if models.is_empty() {
            return Ok(Vec::new());
        }

        let mut subject_ids: Vec<i64> = models.iter().map(|m| m.subject_id).collect();
        subject_ids.sort_unstable();
        subject_ids.dedup();
        let subject_names = Self::subject_names(&self.db, subject_ids).await?;

        let student_ids: Vec<i64> = models.iter().map(|m| m.student_id).collect();
        let students: HashMap<i64, User> = Users::find()
            .filter(UserColumn::Id.is_in(student_ids))
            .all(&self.db)
            .await
            .map_err(|e| ClassroomError::database_operation(format!("查询学生失败: {e}")))?
            .into_iter()
            .map(|u| (u.id, u.into_user()))
            .collect();

        Ok(models
            .into_iter()
            .map(|m| AttendanceDetail {
                subject_name: subject_names.get(&m.subject_id).cloned(),
                student: students.get(&m.student_id).cloned(),
                attendance: m.into_attendance(),
            })
            .collect())
    }
}
