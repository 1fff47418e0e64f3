//! 评论存储操作

use super::{SeaOrmStorage, map_write_err};
use crate::entity::comments::{ActiveModel, Column, Entity as Comments};
use crate::errors::{ClassroomError, Result};
use crate::models::comments::entities::{Comment, CommentTarget};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    pub async fn create_comment_impl(
        &self,
        user_id: i64,
        target: CommentTarget,
        content: &str,
    ) -> Result<Comment> {
        let (assignment_id, submission_id) = match target {
            CommentTarget::Assignment(id) => (Some(id), None),
            CommentTarget::Submission(id) => (None, Some(id)),
        };

        let model = ActiveModel {
            user_id: Set(user_id),
            assignment_id: Set(assignment_id),
            submission_id: Set(submission_id),
            content: Set(content.to_string()),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| map_write_err("创建评论失败", e))?;

        Ok(result.into_comment())
    }

    pub async fn get_comment_by_id_impl(&self, comment_id: i64) -> Result<Option<Comment>> {
        let result = Comments::find_by_id(comment_id)
            .one(&self.db)
            .await
            .map_err(|e| ClassroomError::database_operation(format!("查询评论失败: {e}")))?;

        Ok(result.map(|m| m.into_comment()))
    }

    /// 按时间正序列出评论
    pub async fn list_comments_impl(&self, target: CommentTarget) -> Result<Vec<Comment>> {
        let filter = match target {
            CommentTarget::Assignment(id) => Column::AssignmentId.eq(id),
            CommentTarget::Submission(id) => Column::SubmissionId.eq(id),
        };

        let result = Comments::find()
            .filter(filter)
            .order_by_asc(Column::CreatedAt)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| ClassroomError::database_operation(format!("查询评论列表失败: {e}")))?;

        Ok(result.into_iter().map(|m| m.into_comment()).collect())
    }

    pub async fn delete_comment_impl(&self, comment_id: i64) -> Result<bool> {
        let result = Comments::delete_by_id(comment_id)
            .exec(&self.db)
            .await
            .map_err(|e| ClassroomError::database_operation(format!("删除评论失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}
