use super::entities::UserRole;
use serde::Deserialize;

// 个人资料更新请求
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProfileRequest {
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub bio: Option<String>,
}

// 角色选择请求
#[derive(Debug, Clone, Deserialize)]
pub struct SelectRoleRequest {
    pub role: UserRole,
}

// 用户更新（用于存储层）
#[derive(Debug, Clone, Default)]
pub struct UpdateUser {
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub bio: Option<String>,
    pub image: Option<String>,
}
