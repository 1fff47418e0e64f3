use serde::{Deserialize, Serialize};

use crate::errors::{ClassroomError, Result};
use crate::models::define_string_enum;

define_string_enum! {
    /// 用户角色，注册后一次性选择
    UserRole, "user role" {
        Teacher => "teacher",
        Student => "student",
    }
}

impl UserRole {
    pub const TEACHER: &'static str = "teacher";
    pub const STUDENT: &'static str = "student";
    /// 未选择角色时写入令牌的占位值
    pub const NONE: &'static str = "none";
}

// 用户实体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing, default)] // 不序列化到JSON响应中
    pub password_hash: String,
    pub display_name: Option<String>,
    pub role: Option<UserRole>,
    pub image: Option<String>,
    pub bio: Option<String>,
    pub last_login: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 对其他用户可见的资料
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: i64,
    pub username: String,
    pub display_name: Option<String>,
    pub role: Option<UserRole>,
    pub image: Option<String>,
    pub bio: Option<String>,
}

impl User {
    pub fn is_teacher(&self) -> bool {
        self.role == Some(UserRole::Teacher)
    }

    pub fn is_student(&self) -> bool {
        self.role == Some(UserRole::Student)
    }

    pub fn role_str(&self) -> &'static str {
        self.role.map(|r| r.as_str()).unwrap_or(UserRole::NONE)
    }

    pub fn to_public(&self) -> PublicUser {
        PublicUser {
            id: self.id,
            username: self.username.clone(),
            display_name: self.display_name.clone(),
            role: self.role,
            image: self.image.clone(),
            bio: self.bio.clone(),
        }
    }

    // 生成 token 对（access + refresh）
    pub fn generate_token_pair(
        &self,
        refresh_token_expiry: Option<chrono::TimeDelta>,
    ) -> Result<crate::utils::jwt::TokenPair> {
        crate::utils::jwt::JwtUtils::generate_token_pair(
            self.id,
            self.role_str(),
            refresh_token_expiry,
        )
        .map_err(|e| ClassroomError::authentication(format!("Failed to generate tokens: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse() {
        assert_eq!("teacher".parse::<UserRole>(), Ok(UserRole::Teacher));
        assert_eq!("student".parse::<UserRole>(), Ok(UserRole::Student));
        assert!("admin".parse::<UserRole>().is_err());
        assert!(serde_json::from_str::<UserRole>("\"user\"").is_err());
    }

    #[test]
    fn test_role_serde_roundtrip() {
        for role in [UserRole::Teacher, UserRole::Student] {
            let json = serde_json::to_string(&role).unwrap();
            assert_eq!(json, format!("\"{}\"", role.as_str()));
            assert_eq!(serde_json::from_str::<UserRole>(&json).unwrap(), role);
        }
        assert_eq!(UserRole::Teacher.to_string(), UserRole::TEACHER);
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let user = User {
            id: 1,
            username: "alice".into(),
            email: "alice@example.com".into(),
            password_hash: "secret".into(),
            display_name: None,
            role: None,
            image: None,
            bio: None,
            last_login: None,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("secret"));
        assert_eq!(user.role_str(), UserRole::NONE);
    }
}
