//! 学科存储操作

use super::{SeaOrmStorage, map_write_err};
use crate::entity::subjects::{ActiveModel, Column, Entity as Subjects};
use crate::errors::{ClassroomError, Result};
use crate::models::subjects::entities::Subject;
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set};

impl SeaOrmStorage {
    /// 创建学科，重名由唯一索引拒绝
    pub async fn create_subject_impl(&self, name: &str) -> Result<Subject> {
        let model = ActiveModel {
            name: Set(name.to_string()),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| map_write_err("创建学科失败", e))?;

        Ok(result.into_subject())
    }

    pub async fn get_subject_by_id_impl(&self, subject_id: i64) -> Result<Option<Subject>> {
        let result = Subjects::find_by_id(subject_id)
            .one(&self.db)
            .await
            .map_err(|e| ClassroomError::database_operation(format!("查询学科失败: {e}")))?;

        Ok(result.map(|m| m.into_subject()))
    }

    pub async fn list_subjects_impl(&self) -> Result<Vec<Subject>> {
        let result = Subjects::find()
            .order_by_asc(Column::Name)
            .all(&self.db)
            .await
            .map_err(|e| ClassroomError::database_operation(format!("查询学科列表失败: {e}")))?;

        Ok(result.into_iter().map(|m| m.into_subject()).collect())
    }
}
