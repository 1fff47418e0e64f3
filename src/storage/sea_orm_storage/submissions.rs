//! 提交存储操作

use super::{SeaOrmStorage, map_write_err};
use crate::entity::submissions::{ActiveModel, Column, Entity as Submissions};
use crate::errors::{ClassroomError, Result};
use crate::models::submissions::{
    entities::{Submission, SubmissionStatus},
    requests::CreateSubmission,
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    pub async fn create_submission_impl(&self, req: CreateSubmission) -> Result<Submission> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            assignment_id: Set(req.assignment_id),
            student_id: Set(req.student_id),
            filename: Set(req.filename),
            object_key: Set(req.object_key),
            grade: Set(None),
            status: Set(req.status.to_string()),
            is_late: Set(req.is_late),
            submitted_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| map_write_err("创建提交失败", e))?;

        Ok(result.into_submission())
    }

    pub async fn get_submission_by_id_impl(
        &self,
        submission_id: i64,
    ) -> Result<Option<Submission>> {
        let result = Submissions::find_by_id(submission_id)
            .one(&self.db)
            .await
            .map_err(|e| ClassroomError::database_operation(format!("查询提交失败: {e}")))?;

        Ok(result.map(|m| m.into_submission()))
    }

    pub async fn get_submission_by_object_key_impl(
        &self,
        object_key: &str,
    ) -> Result<Option<Submission>> {
        let result = Submissions::find()
            .filter(Column::ObjectKey.eq(object_key))
            .one(&self.db)
            .await
            .map_err(|e| ClassroomError::database_operation(format!("查询提交失败: {e}")))?;

        Ok(result.map(|m| m.into_submission()))
    }

    pub async fn list_submissions_by_assignment_impl(
        &self,
        assignment_id: i64,
    ) -> Result<Vec<Submission>> {
        let result = Submissions::find()
            .filter(Column::AssignmentId.eq(assignment_id))
            .order_by_desc(Column::SubmittedAt)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| ClassroomError::database_operation(format!("查询提交列表失败: {e}")))?;

        Ok(result.into_iter().map(|m| m.into_submission()).collect())
    }

    /// 学生自己的提交历史，最新的在前
    pub async fn list_student_submissions_impl(
        &self,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<Vec<Submission>> {
        let result = Submissions::find()
            .filter(Column::AssignmentId.eq(assignment_id))
            .filter(Column::StudentId.eq(student_id))
            .order_by_desc(Column::SubmittedAt)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| ClassroomError::database_operation(format!("查询提交列表失败: {e}")))?;

        Ok(result.into_iter().map(|m| m.into_submission()).collect())
    }

    pub async fn update_submission_status_impl(
        &self,
        submission_id: i64,
        status: SubmissionStatus,
    ) -> Result<Option<Submission>> {
        if self.get_submission_by_id_impl(submission_id).await?.is_none() {
            return Ok(None);
        }

        let model = ActiveModel {
            id: Set(submission_id),
            status: Set(status.to_string()),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        model
            .update(&self.db)
            .await
            .map_err(|e| ClassroomError::database_operation(format!("更新提交状态失败: {e}")))?;

        self.get_submission_by_id_impl(submission_id).await
    }

    pub async fn grade_submission_impl(
        &self,
        submission_id: i64,
        grade: f64,
    ) -> Result<Option<Submission>> {
        if self.get_submission_by_id_impl(submission_id).await?.is_none() {
            return Ok(None);
        }

        let model = ActiveModel {
            id: Set(submission_id),
            grade: Set(Some(grade)),
            status: Set(SubmissionStatus::Graded.to_string()),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        model
            .update(&self.db)
            .await
            .map_err(|e| ClassroomError::database_operation(format!("评分失败: {e}")))?;

        self.get_submission_by_id_impl(submission_id).await
    }

    pub async fn delete_submission_impl(&self, submission_id: i64) -> Result<bool> {
        let result = Submissions::delete_by_id(submission_id)
            .exec(&self.db)
            .await
            .map_err(|e| ClassroomError::database_operation(format!("删除提交失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}
