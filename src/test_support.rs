//! 测试夹具：内存数据库、内存对象存储以及常用实体

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::models::{
    assignments::{
        entities::{Assignment, AssignmentStatus},
        requests::CreateAssignment,
    },
    auth::requests::CreateUser,
    classrooms::{
        entities::{Classroom, ClassroomModifier, ClassroomStatus},
        requests::CreateClassroom,
    },
    submissions::{
        entities::{Submission, SubmissionStatus},
        requests::CreateSubmission,
    },
    users::entities::{User, UserRole},
};
use crate::object_store::ObjectStore;
use crate::object_store::keys::submission_key;
use crate::object_store::backends::memory::MemoryObjectStore;
use crate::storage::Storage;
use crate::storage::sea_orm_storage::SeaOrmStorage;
use crate::utils::password::hash_password;

pub const PASSWORD: &str = "Classroom42";

pub async fn storage() -> Arc<dyn Storage> {
    Arc::new(
        SeaOrmStorage::new_in_memory()
            .await
            .expect("in-memory storage"),
    )
}

/// 返回具体类型以便断言，调用处按需转换为 `Arc<dyn ObjectStore>`
pub fn object_store() -> Arc<MemoryObjectStore> {
    Arc::new(MemoryObjectStore::new("http://localhost/api/v1/storage/public"))
}

pub fn as_dyn(store: &Arc<MemoryObjectStore>) -> Arc<dyn ObjectStore> {
    store.clone()
}

pub fn create_user_request(username: &str) -> CreateUser {
    CreateUser {
        username: username.to_string(),
        email: format!("{username}@example.com"),
        password_hash: hash_password(PASSWORD).expect("hash"),
        display_name: None,
    }
}

pub async fn create_user(
    storage: &Arc<dyn Storage>,
    username: &str,
    role: Option<UserRole>,
) -> User {
    let user = storage
        .create_user(create_user_request(username))
        .await
        .expect("create user");
    if let Some(role) = role {
        storage
            .set_user_role_if_unset(user.id, role)
            .await
            .expect("set role");
    }
    storage
        .get_user_by_id(user.id)
        .await
        .expect("get user")
        .expect("user exists")
}

pub async fn teacher(storage: &Arc<dyn Storage>, username: &str) -> User {
    create_user(storage, username, Some(UserRole::Teacher)).await
}

pub async fn student(storage: &Arc<dyn Storage>, username: &str) -> User {
    create_user(storage, username, Some(UserRole::Student)).await
}

pub async fn classroom(
    storage: &Arc<dyn Storage>,
    owner: &User,
    modifier: ClassroomModifier,
    password: Option<&str>,
) -> Classroom {
    storage
        .create_classroom(CreateClassroom {
            owner_id: owner.id,
            name: "Algebra".to_string(),
            description: None,
            modifier,
            password_hash: password.map(|p| hash_password(p).expect("hash")),
            status: ClassroomStatus::Active,
            language: "en".to_string(),
        })
        .await
        .expect("create classroom")
}

pub async fn assignment(
    storage: &Arc<dyn Storage>,
    classroom_id: i64,
    due_date: Option<DateTime<Utc>>,
) -> Assignment {
    storage
        .create_assignment(CreateAssignment {
            classroom_id,
            subject_id: None,
            name: "Homework 1".to_string(),
            description: None,
            due_date,
            status: AssignmentStatus::Open,
        })
        .await
        .expect("create assignment")
}

pub async fn enroll(storage: &Arc<dyn Storage>, classroom_id: i64, student_id: i64) {
    storage
        .enroll_student(classroom_id, student_id)
        .await
        .expect("enroll");
}

/// 直接写入提交记录，对象键按真实布局生成
pub async fn submission(
    storage: &Arc<dyn Storage>,
    assignment: &Assignment,
    student_id: i64,
    filename: &str,
) -> Submission {
    storage
        .create_submission(CreateSubmission {
            assignment_id: assignment.id,
            student_id,
            filename: filename.to_string(),
            object_key: submission_key(assignment.classroom_id, assignment.id, student_id, filename),
            status: SubmissionStatus::Pending,
            is_late: false,
        })
        .await
        .expect("create submission")
}
