use serde::{Deserialize, Serialize};

use crate::models::define_string_enum;
use crate::models::users::entities::PublicUser;

define_string_enum! {
    /// 教室可见性
    ClassroomModifier, "classroom modifier" {
        Public => "public",
        Private => "private",
    }
}

define_string_enum! {
    ClassroomStatus, "classroom status" {
        Active => "active",
        Inactive => "inactive",
        Archived => "archived",
    }
}

// 教室实体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Classroom {
    pub id: i64,
    pub owner_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub modifier: ClassroomModifier,
    #[serde(skip_serializing, default)] // 不序列化到JSON响应中
    pub password_hash: Option<String>,
    pub status: ClassroomStatus,
    pub language: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Classroom {
    pub fn is_owned_by(&self, user_id: i64) -> bool {
        self.owner_id == user_id
    }

    pub fn accepts_enrollment(&self) -> bool {
        self.status == ClassroomStatus::Active
    }
}

// 选课关系
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enrollment {
    pub id: i64,
    pub classroom_id: i64,
    pub student_id: i64,
    pub joined_at: chrono::DateTime<chrono::Utc>,
}

// 教室学生列表项
#[derive(Debug, Clone, Serialize)]
pub struct ClassroomStudent {
    pub student: PublicUser,
    pub joined_at: chrono::DateTime<chrono::Utc>,
}
