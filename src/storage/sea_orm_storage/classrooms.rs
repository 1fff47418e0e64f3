//! 教室存储操作

use super::{SeaOrmStorage, map_write_err};
use crate::entity::classroom_students::{Column as EnrollmentColumn, Entity as ClassroomStudents};
use crate::entity::classrooms::{ActiveModel, Column, Entity as Classrooms};
use crate::errors::{ClassroomError, Result};
use crate::models::{
    PaginationInfo,
    classrooms::{
        entities::{Classroom, ClassroomStatus},
        requests::{ClassroomListQuery, CreateClassroom, UpdateClassroom},
        responses::ClassroomListResponse,
    },
};
use crate::utils::escape_like_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Select,
    Set,
};

impl SeaOrmStorage {
    /// 创建教室
    pub async fn create_classroom_impl(&self, req: CreateClassroom) -> Result<Classroom> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            owner_id: Set(req.owner_id),
            name: Set(req.name),
            description: Set(req.description),
            modifier: Set(req.modifier.to_string()),
            password_hash: Set(req.password_hash),
            status: Set(req.status.to_string()),
            language: Set(req.language),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| map_write_err("创建教室失败", e))?;

        Ok(result.into_classroom())
    }

    /// 通过 ID 获取教室
    pub async fn get_classroom_by_id_impl(&self, classroom_id: i64) -> Result<Option<Classroom>> {
        let result = Classrooms::find_by_id(classroom_id)
            .one(&self.db)
            .await
            .map_err(|e| ClassroomError::database_operation(format!("查询教室失败: {e}")))?;

        Ok(result.map(|m| m.into_classroom()))
    }

    /// 更新教室信息
    pub async fn update_classroom_impl(
        &self,
        classroom_id: i64,
        update: UpdateClassroom,
    ) -> Result<Option<Classroom>> {
        // 先检查教室是否存在
        if self.get_classroom_by_id_impl(classroom_id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(classroom_id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        if let Some(name) = update.name {
            model.name = Set(name);
        }

        if let Some(description) = update.description {
            model.description = Set(Some(description));
        }

        if let Some(modifier) = update.modifier {
            model.modifier = Set(modifier.to_string());
        }

        if let Some(password_hash) = update.password_hash {
            model.password_hash = Set(password_hash);
        }

        if let Some(status) = update.status {
            model.status = Set(status.to_string());
        }

        if let Some(language) = update.language {
            model.language = Set(language);
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| map_write_err("更新教室失败", e))?;

        self.get_classroom_by_id_impl(classroom_id).await
    }

    /// 删除教室，子记录由外键级联删除
    pub async fn delete_classroom_impl(&self, classroom_id: i64) -> Result<bool> {
        let result = Classrooms::delete_by_id(classroom_id)
            .exec(&self.db)
            .await
            .map_err(|e| ClassroomError::database_operation(format!("删除教室失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 教师拥有的教室
    pub async fn list_owned_classrooms_impl(
        &self,
        owner_id: i64,
        query: ClassroomListQuery,
    ) -> Result<ClassroomListResponse> {
        let select = Classrooms::find().filter(Column::OwnerId.eq(owner_id));
        self.paginate_classrooms(select, query).await
    }

    /// 学生加入的教室
    pub async fn list_enrolled_classrooms_impl(
        &self,
        student_id: i64,
        query: ClassroomListQuery,
    ) -> Result<ClassroomListResponse> {
        let select = Classrooms::find()
            .inner_join(ClassroomStudents)
            .filter(EnrollmentColumn::StudentId.eq(student_id));
        self.paginate_classrooms(select, query).await
    }

    /// 浏览处于 active 状态的教室
    pub async fn browse_classrooms_impl(
        &self,
        query: ClassroomListQuery,
    ) -> Result<ClassroomListResponse> {
        let select =
            Classrooms::find().filter(Column::Status.eq(ClassroomStatus::Active.to_string()));
        self.paginate_classrooms(select, query).await
    }

    /// 附加搜索与语言筛选后分页
    async fn paginate_classrooms(
        &self,
        mut select: Select<Classrooms>,
        query: ClassroomListQuery,
    ) -> Result<ClassroomListResponse> {
        let page = query.page.max(1);
        let size = query.size.clamp(1, 100);

        // 搜索条件
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select.filter(Column::Name.contains(&escaped));
        }

        // 语言筛选
        if let Some(ref language) = query.language
            && !language.trim().is_empty()
        {
            select = select.filter(Column::Language.eq(language.trim()));
        }

        // 排序
        select = select
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id);

        // 分页查询
        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| ClassroomError::database_operation(format!("查询教室总数失败: {e}")))?;

        let classrooms = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| ClassroomError::database_operation(format!("查询教室列表失败: {e}")))?;

        Ok(ClassroomListResponse {
            items: classrooms.into_iter().map(|m| m.into_classroom()).collect(),
            pagination: PaginationInfo::new(page, size, total),
        })
    }
}
