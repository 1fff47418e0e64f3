//! 作业存储操作

use super::{SeaOrmStorage, map_write_err};
use crate::entity::assignments::{ActiveModel, Column, Entity as Assignments};
use crate::errors::{ClassroomError, Result};
use crate::models::assignments::{
    entities::Assignment,
    requests::{CreateAssignment, UpdateAssignmentRequest},
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    /// 创建作业
    pub async fn create_assignment_impl(&self, req: CreateAssignment) -> Result<Assignment> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            classroom_id: Set(req.classroom_id),
            subject_id: Set(req.subject_id),
            name: Set(req.name),
            description: Set(req.description),
            due_date: Set(req.due_date.map(|d| d.timestamp())),
            status: Set(req.status.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| map_write_err("创建作业失败", e))?;

        Ok(result.into_assignment())
    }

    /// 通过 ID 获取作业
    pub async fn get_assignment_by_id_impl(
        &self,
        assignment_id: i64,
    ) -> Result<Option<Assignment>> {
        let result = Assignments::find_by_id(assignment_id)
            .one(&self.db)
            .await
            .map_err(|e| ClassroomError::database_operation(format!("查询作业失败: {e}")))?;

        Ok(result.map(|m| m.into_assignment()))
    }

    /// 列出教室作业，按截止时间排序，无截止时间的排在最后
    pub async fn list_assignments_by_classroom_impl(
        &self,
        classroom_id: i64,
    ) -> Result<Vec<Assignment>> {
        let result = Assignments::find()
            .filter(Column::ClassroomId.eq(classroom_id))
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| ClassroomError::database_operation(format!("查询作业列表失败: {e}")))?;

        let mut assignments: Vec<Assignment> =
            result.into_iter().map(|m| m.into_assignment()).collect();
        assignments.sort_by_key(|a| (a.due_date.is_none(), a.due_date));
        Ok(assignments)
    }

    /// 更新作业信息
    pub async fn update_assignment_impl(
        &self,
        assignment_id: i64,
        update: UpdateAssignmentRequest,
    ) -> Result<Option<Assignment>> {
        if self.get_assignment_by_id_impl(assignment_id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(assignment_id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        if let Some(name) = update.name {
            model.name = Set(name);
        }

        if let Some(description) = update.description {
            model.description = Set(Some(description));
        }

        if let Some(subject_id) = update.subject_id {
            model.subject_id = Set(Some(subject_id));
        }

        if let Some(due_date) = update.due_date {
            model.due_date = Set(Some(due_date.timestamp()));
        }

        if let Some(status) = update.status {
            model.status = Set(status.to_string());
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| map_write_err("更新作业失败", e))?;

        self.get_assignment_by_id_impl(assignment_id).await
    }

    /// 删除作业，附件、提交、评论由外键级联删除
    pub async fn delete_assignment_impl(&self, assignment_id: i64) -> Result<bool> {
        let result = Assignments::delete_by_id(assignment_id)
            .exec(&self.db)
            .await
            .map_err(|e| ClassroomError::database_operation(format!("删除作业失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}
