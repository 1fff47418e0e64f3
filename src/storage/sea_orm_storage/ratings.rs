//! 评级存储操作

use super::{SeaOrmStorage, map_write_err};
use crate::entity::ratings::{ActiveModel, Column, Entity as Ratings};
use crate::errors::{ClassroomError, Result};
use crate::models::ratings::entities::Rating;
use sea_orm::{
    ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, sea_query::OnConflict,
};

impl SeaOrmStorage {
    /// 插入或覆盖评级
    pub async fn upsert_rating_impl(
        &self,
        classroom_id: i64,
        student_id: i64,
        amount: i32,
    ) -> Result<Rating> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            classroom_id: Set(classroom_id),
            student_id: Set(student_id),
            amount: Set(amount),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        Ratings::insert(model)
            .on_conflict(
                OnConflict::columns([Column::ClassroomId, Column::StudentId])
                    .update_columns([Column::Amount, Column::UpdatedAt])
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(|e| map_write_err("设置评级失败", e))?;

        self.get_rating_impl(classroom_id, student_id)
            .await?
            .ok_or_else(|| ClassroomError::database_operation("评级写入后未找到"))
    }

    pub async fn get_rating_impl(
        &self,
        classroom_id: i64,
        student_id: i64,
    ) -> Result<Option<Rating>> {
        let result = Ratings::find()
            .filter(Column::ClassroomId.eq(classroom_id))
            .filter(Column::StudentId.eq(student_id))
            .one(&self.db)
            .await
            .map_err(|e| ClassroomError::database_operation(format!("查询评级失败: {e}")))?;

        Ok(result.map(|m| m.into_rating()))
    }

    pub async fn list_ratings_impl(&self, classroom_id: i64) -> Result<Vec<Rating>> {
        let result = Ratings::find()
            .filter(Column::ClassroomId.eq(classroom_id))
            .order_by_asc(Column::StudentId)
            .all(&self.db)
            .await
            .map_err(|e| ClassroomError::database_operation(format!("查询评级列表失败: {e}")))?;

        Ok(result.into_iter().map(|m| m.into_rating()).collect())
    }
}

#[cfg(test)]
mod tests {
    use crate::models::classrooms::entities::ClassroomModifier;
    use crate::storage::Storage;
    use crate::test_support;

    #[tokio::test]
    async fn test_upsert_replaces_amount() {
        let storage = test_support::storage().await;
        let teacher = test_support::teacher(&storage, "t1").await;
        let student = test_support::student(&storage, "s1").await;
        let classroom =
            test_support::classroom(&storage, &teacher, ClassroomModifier::Public, None).await;

        let first = storage.upsert_rating(classroom.id, student.id, 3).await.unwrap();
        let second = storage.upsert_rating(classroom.id, student.id, 5).await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.amount, 5);
        assert_eq!(storage.list_ratings(classroom.id).await.unwrap().len(), 1);
    }
}
