use std::sync::Arc;

use crate::models::{
    assignments::{
        entities::Assignment,
        requests::{CreateAssignment, UpdateAssignmentRequest},
    },
    attachments::{entities::Attachment, requests::CreateAttachment},
    auth::requests::CreateUser,
    classrooms::{
        entities::{Classroom, Enrollment},
        requests::{ClassroomListQuery, CreateClassroom, UpdateClassroom},
        responses::{ClassroomListResponse, ClassroomStudentListResponse},
    },
    comments::entities::{Comment, CommentTarget},
    ratings::entities::Rating,
    subjects::entities::Subject,
    submissions::{
        entities::{Submission, SubmissionStatus},
        requests::CreateSubmission,
    },
    users::{
        entities::{User, UserRole},
        requests::UpdateUser,
    },
};

use crate::errors::Result;

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户管理方法
    // 创建用户
    async fn create_user(&self, user: CreateUser) -> Result<User>;
    // 通过ID获取用户信息
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    // 通过用户名获取用户信息
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;
    // 通过邮箱获取用户信息
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    // 通过用户名或邮箱获取用户信息
    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>>;
    // 更新用户资料
    async fn update_user(&self, id: i64, update: UpdateUser) -> Result<Option<User>>;
    // 仅当角色为空时写入角色，返回是否写入
    async fn set_user_role_if_unset(&self, id: i64, role: UserRole) -> Result<bool>;
    // 更新用户最后登录时间
    async fn update_last_login(&self, id: i64) -> Result<bool>;

    /// 教室管理方法
    async fn create_classroom(&self, classroom: CreateClassroom) -> Result<Classroom>;
    async fn get_classroom_by_id(&self, classroom_id: i64) -> Result<Option<Classroom>>;
    async fn update_classroom(
        &self,
        classroom_id: i64,
        update: UpdateClassroom,
    ) -> Result<Option<Classroom>>;
    // 删除教室（级联删除选课、作业、评级）
    async fn delete_classroom(&self, classroom_id: i64) -> Result<bool>;
    // 教师拥有的教室
    async fn list_owned_classrooms(
        &self,
        owner_id: i64,
        query: ClassroomListQuery,
    ) -> Result<ClassroomListResponse>;
    // 学生加入的教室
    async fn list_enrolled_classrooms(
        &self,
        student_id: i64,
        query: ClassroomListQuery,
    ) -> Result<ClassroomListResponse>;
    // 浏览可加入的教室（仅 active）
    async fn browse_classrooms(&self, query: ClassroomListQuery) -> Result<ClassroomListResponse>;

    /// 选课管理方法
    async fn enroll_student(&self, classroom_id: i64, student_id: i64) -> Result<Enrollment>;
    async fn unenroll_student(&self, classroom_id: i64, student_id: i64) -> Result<bool>;
    async fn is_enrolled(&self, classroom_id: i64, student_id: i64) -> Result<bool>;
    async fn list_classroom_students(
        &self,
        classroom_id: i64,
        page: u64,
        size: u64,
    ) -> Result<ClassroomStudentListResponse>;

    /// 学科管理方法
    async fn create_subject(&self, name: &str) -> Result<Subject>;
    async fn get_subject_by_id(&self, subject_id: i64) -> Result<Option<Subject>>;
    async fn list_subjects(&self) -> Result<Vec<Subject>>;

    /// 作业管理方法
    async fn create_assignment(&self, assignment: CreateAssignment) -> Result<Assignment>;
    async fn get_assignment_by_id(&self, assignment_id: i64) -> Result<Option<Assignment>>;
    async fn list_assignments_by_classroom(&self, classroom_id: i64) -> Result<Vec<Assignment>>;
    async fn update_assignment(
        &self,
        assignment_id: i64,
        update: UpdateAssignmentRequest,
    ) -> Result<Option<Assignment>>;
    async fn delete_assignment(&self, assignment_id: i64) -> Result<bool>;

    /// 附件管理方法
    async fn create_attachment(&self, attachment: CreateAttachment) -> Result<Attachment>;
    async fn get_attachment_by_id(&self, attachment_id: i64) -> Result<Option<Attachment>>;
    async fn get_attachment_by_object_key(&self, object_key: &str) -> Result<Option<Attachment>>;
    async fn list_attachments_by_assignment(&self, assignment_id: i64) -> Result<Vec<Attachment>>;
    async fn delete_attachment(&self, attachment_id: i64) -> Result<bool>;

    /// 提交管理方法
    async fn create_submission(&self, submission: CreateSubmission) -> Result<Submission>;
    async fn get_submission_by_id(&self, submission_id: i64) -> Result<Option<Submission>>;
    async fn get_submission_by_object_key(&self, object_key: &str) -> Result<Option<Submission>>;
    async fn list_submissions_by_assignment(&self, assignment_id: i64)
    -> Result<Vec<Submission>>;
    async fn list_student_submissions(
        &self,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<Vec<Submission>>;
    async fn update_submission_status(
        &self,
        submission_id: i64,
        status: SubmissionStatus,
    ) -> Result<Option<Submission>>;
    // 写入成绩并置为 graded
    async fn grade_submission(&self, submission_id: i64, grade: f64)
    -> Result<Option<Submission>>;
    async fn delete_submission(&self, submission_id: i64) -> Result<bool>;

    /// 评论管理方法
    async fn create_comment(
        &self,
        user_id: i64,
        target: CommentTarget,
        content: &str,
    ) -> Result<Comment>;
    async fn get_comment_by_id(&self, comment_id: i64) -> Result<Option<Comment>>;
    async fn list_comments(&self, target: CommentTarget) -> Result<Vec<Comment>>;
    async fn delete_comment(&self, comment_id: i64) -> Result<bool>;

    /// 评级管理方法
    // 每个 (教室, 学生) 只有一条评级，重复设置覆盖分值
    async fn upsert_rating(&self, classroom_id: i64, student_id: i64, amount: i32)
    -> Result<Rating>;
    async fn get_rating(&self, classroom_id: i64, student_id: i64) -> Result<Option<Rating>>;
    async fn list_ratings(&self, classroom_id: i64) -> Result<Vec<Rating>>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
