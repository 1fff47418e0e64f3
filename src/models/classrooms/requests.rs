use super::entities::{ClassroomModifier, ClassroomStatus};
use crate::models::common::PaginationQuery;
use serde::Deserialize;

// 创建教室请求
#[derive(Debug, Clone, Deserialize)]
pub struct CreateClassroomRequest {
    pub name: String,
    pub description: Option<String>,
    pub modifier: ClassroomModifier,
    /// 私有教室必填
    pub password: Option<String>,
    pub status: Option<ClassroomStatus>,
    pub language: Option<String>,
}

// 更新教室请求（部分更新）
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateClassroomRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub modifier: Option<ClassroomModifier>,
    pub password: Option<String>,
    pub status: Option<ClassroomStatus>,
    pub language: Option<String>,
}

// 加入教室请求
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EnrollRequest {
    pub password: Option<String>,
}

// 浏览教室查询参数
#[derive(Debug, Clone, Deserialize)]
pub struct BrowseClassroomsParams {
    #[serde(flatten)]
    pub pagination: PaginationQuery,
    pub search: Option<String>,
    pub language: Option<String>,
}

// 教室创建（用于存储层）
#[derive(Debug, Clone)]
pub struct CreateClassroom {
    pub owner_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub modifier: ClassroomModifier,
    pub password_hash: Option<String>,
    pub status: ClassroomStatus,
    pub language: String,
}

// 教室更新（用于存储层），password_hash 为 Some(None) 时清空密码
#[derive(Debug, Clone, Default)]
pub struct UpdateClassroom {
    pub name: Option<String>,
    pub description: Option<String>,
    pub modifier: Option<ClassroomModifier>,
    pub password_hash: Option<Option<String>>,
    pub status: Option<ClassroomStatus>,
    pub language: Option<String>,
}

// 教室列表查询（用于存储层）
#[derive(Debug, Clone, Default)]
pub struct ClassroomListQuery {
    pub page: u64,
    pub size: u64,
    pub search: Option<String>,
    pub language: Option<String>,
}
