//! 选课存储操作

use std::collections::HashMap;

use super::{SeaOrmStorage, map_write_err};
use crate::entity::classroom_students::{ActiveModel, Column, Entity as ClassroomStudents};
use crate::entity::users::{Column as UserColumn, Entity as Users};
use crate::errors::{ClassroomError, Result};
use crate::models::{
    PaginationInfo,
    classrooms::{
        entities::{ClassroomStudent, Enrollment},
        responses::ClassroomStudentListResponse,
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

impl SeaOrmStorage {
    /// 学生加入教室，重复加入由唯一索引拒绝
    pub async fn enroll_student_impl(
        &self,
        classroom_id: i64,
        student_id: i64,
    ) -> Result<Enrollment> {
        let model = ActiveModel {
            classroom_id: Set(classroom_id),
            student_id: Set(student_id),
            joined_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| map_write_err("加入教室失败", e))?;

        Ok(result.into_enrollment())
    }

    /// 学生离开/被移出教室
    pub async fn unenroll_student_impl(&self, classroom_id: i64, student_id: i64) -> Result<bool> {
        let result = ClassroomStudents::delete_many()
            .filter(Column::ClassroomId.eq(classroom_id))
            .filter(Column::StudentId.eq(student_id))
            .exec(&self.db)
            .await
            .map_err(|e| ClassroomError::database_operation(format!("离开教室失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    pub async fn is_enrolled_impl(&self, classroom_id: i64, student_id: i64) -> Result<bool> {
        let count = ClassroomStudents::find()
            .filter(Column::ClassroomId.eq(classroom_id))
            .filter(Column::StudentId.eq(student_id))
            .count(&self.db)
            .await
            .map_err(|e| ClassroomError::database_operation(format!("查询选课关系失败: {e}")))?;

        Ok(count > 0)
    }

    /// 分页列出教室学生
    pub async fn list_classroom_students_impl(
        &self,
        classroom_id: i64,
        page: u64,
        size: u64,
    ) -> Result<ClassroomStudentListResponse> {
        let page = page.max(1);
        let size = size.clamp(1, 100);

        let paginator = ClassroomStudents::find()
            .filter(Column::ClassroomId.eq(classroom_id))
            .order_by_asc(Column::JoinedAt)
            .order_by_asc(Column::Id)
            .paginate(&self.db, size);

        let total = paginator.num_items().await.map_err(|e| {
            ClassroomError::database_operation(format!("查询教室学生总数失败: {e}"))
        })?;

        let enrollments = paginator.fetch_page(page - 1).await.map_err(|e| {
            ClassroomError::database_operation(format!("查询教室学生列表失败: {e}"))
        })?;

        // 批量查询学生资料
        let student_ids: Vec<i64> = enrollments.iter().map(|e| e.student_id).collect();
        let users: HashMap<i64, _> = Users::find()
            .filter(UserColumn::Id.is_in(student_ids))
            .all(&self.db)
            .await
            .map_err(|e| ClassroomError::database_operation(format!("查询学生资料失败: {e}")))?
            .into_iter()
            .map(|m| (m.id, m.into_user()))
            .collect();

        let items = enrollments
            .into_iter()
            .filter_map(|enrollment| {
                let enrollment = enrollment.into_enrollment();
                users.get(&enrollment.student_id).map(|user| ClassroomStudent {
                    student: user.to_public(),
                    joined_at: enrollment.joined_at,
                })
            })
            .collect();

        Ok(ClassroomStudentListResponse {
            items,
            pagination: PaginationInfo::new(page, size, total),
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::models::classrooms::entities::ClassroomModifier;
    use crate::storage::Storage;
    use crate::test_support;

    #[tokio::test]
    async fn test_enroll_twice_conflicts() {
        let storage = test_support::storage().await;
        let teacher = test_support::teacher(&storage, "t1").await;
        let student = test_support::student(&storage, "s1").await;
        let classroom =
            test_support::classroom(&storage, &teacher, ClassroomModifier::Public, None).await;

        storage.enroll_student(classroom.id, student.id).await.unwrap();
        let err = storage
            .enroll_student(classroom.id, student.id)
            .await
            .unwrap_err();
        assert_eq!(err.transport_code(), "CONFLICT");
    }

    #[tokio::test]
    async fn test_list_and_unenroll() {
        let storage = test_support::storage().await;
        let teacher = test_support::teacher(&storage, "t1").await;
        let s1 = test_support::student(&storage, "s1").await;
        let s2 = test_support::student(&storage, "s2").await;
        let classroom =
            test_support::classroom(&storage, &teacher, ClassroomModifier::Public, None).await;
        storage.enroll_student(classroom.id, s1.id).await.unwrap();
        storage.enroll_student(classroom.id, s2.id).await.unwrap();

        let list = storage
            .list_classroom_students(classroom.id, 1, 10)
            .await
            .unwrap();
        assert_eq!(list.pagination.total, 2);
        assert_eq!(list.items[0].student.username, "s1");

        assert!(storage.unenroll_student(classroom.id, s1.id).await.unwrap());
        assert!(!storage.is_enrolled(classroom.id, s1.id).await.unwrap());
        assert!(storage.is_enrolled(classroom.id, s2.id).await.unwrap());
        assert!(!storage.unenroll_student(classroom.id, s1.id).await.unwrap());
    }
}
