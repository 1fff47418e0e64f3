use super::entities::{Classroom, ClassroomStudent};
use crate::models::common::PaginationInfo;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ClassroomListResponse {
    pub items: Vec<Classroom>,
    pub pagination: PaginationInfo,
}

#[derive(Debug, Serialize)]
pub struct ClassroomStudentListResponse {
    pub items: Vec<ClassroomStudent>,
    pub pagination: PaginationInfo,
}

// 查看单个教室时附带当前用户的身份
#[derive(Debug, Serialize)]
pub struct ClassroomDetailResponse {
    pub classroom: Classroom,
    pub is_owner: bool,
}
