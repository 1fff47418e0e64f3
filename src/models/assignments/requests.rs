use super::entities::AssignmentStatus;
use chrono::{DateTime, Utc};
use serde::Deserialize;

// 创建作业请求
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAssignmentRequest {
    pub name: String,
    pub description: Option<String>,
    pub subject_id: Option<i64>,
    pub due_date: Option<DateTime<Utc>>,
    pub status: Option<AssignmentStatus>,
}

// 更新作业请求（部分更新）
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateAssignmentRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub subject_id: Option<i64>,
    pub due_date: Option<DateTime<Utc>>,
    pub status: Option<AssignmentStatus>,
}

// 作业创建（用于存储层）
#[derive(Debug, Clone)]
pub struct CreateAssignment {
    pub classroom_id: i64,
    pub subject_id: Option<i64>,
    pub name: String,
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub status: AssignmentStatus,
}
