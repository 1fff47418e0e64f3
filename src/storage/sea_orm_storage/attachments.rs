//! 附件存储操作

use super::{SeaOrmStorage, map_write_err};
use crate::entity::attachments::{ActiveModel, Column, Entity as Attachments};
use crate::errors::{ClassroomError, Result};
use crate::models::attachments::{entities::Attachment, requests::CreateAttachment};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    pub async fn create_attachment_impl(&self, req: CreateAttachment) -> Result<Attachment> {
        let model = ActiveModel {
            assignment_id: Set(req.assignment_id),
            filename: Set(req.filename),
            object_key: Set(req.object_key),
            kind: Set(req.kind.to_string()),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| map_write_err("创建附件失败", e))?;

        Ok(result.into_attachment())
    }

    pub async fn get_attachment_by_id_impl(
        &self,
        attachment_id: i64,
    ) -> Result<Option<Attachment>> {
        let result = Attachments::find_by_id(attachment_id)
            .one(&self.db)
            .await
            .map_err(|e| ClassroomError::database_operation(format!("查询附件失败: {e}")))?;

        Ok(result.map(|m| m.into_attachment()))
    }

    pub async fn get_attachment_by_object_key_impl(
        &self,
        object_key: &str,
    ) -> Result<Option<Attachment>> {
        let result = Attachments::find()
            .filter(Column::ObjectKey.eq(object_key))
            .one(&self.db)
            .await
            .map_err(|e| ClassroomError::database_operation(format!("查询附件失败: {e}")))?;

        Ok(result.map(|m| m.into_attachment()))
    }

    pub async fn list_attachments_by_assignment_impl(
        &self,
        assignment_id: i64,
    ) -> Result<Vec<Attachment>> {
        let result = Attachments::find()
            .filter(Column::AssignmentId.eq(assignment_id))
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| ClassroomError::database_operation(format!("查询附件列表失败: {e}")))?;

        Ok(result.into_iter().map(|m| m.into_attachment()).collect())
    }

    pub async fn delete_attachment_impl(&self, attachment_id: i64) -> Result<bool> {
        let result = Attachments::delete_by_id(attachment_id)
            .exec(&self.db)
            .await
            .map_err(|e| ClassroomError::database_operation(format!("删除附件失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}
