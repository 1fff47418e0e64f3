//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod assignments;
mod attachments;
mod classrooms;
mod comments;
mod enrollments;
mod ratings;
mod subjects;
mod submissions;
mod users;

use crate::config::{AppConfig, DatabaseConfig};
use crate::errors::{ClassroomError, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr, SqlErr};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 按全局配置创建存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        Self::connect(&config.database).await
    }

    /// 连接数据库并运行迁移
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let db_url = Self::build_database_url(&config.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite:") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        Self::from_connection(db).await
    }

    /// 单连接内存数据库，多连接时每个连接各自是一个独立的库
    pub async fn new_in_memory() -> Result<Self> {
        let config = DatabaseConfig {
            url: ":memory:".to_string(),
            pool_size: 1,
            timeout: 5,
        };
        Self::connect(&config).await
    }

    async fn from_connection(db: DatabaseConnection) -> Result<Self> {
        // 运行迁移
        Migrator::up(&db, None)
            .await
            .map_err(|e| ClassroomError::database_operation(format!("数据库迁移失败: {e}")))?;

        info!("SeaORM 存储初始化完成");

        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, config: &DatabaseConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let in_memory = url.contains(":memory:");

        let mut opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| ClassroomError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(5));

        if !in_memory {
            opt = opt
                .journal_mode(SqliteJournalMode::Wal)
                .synchronous(SqliteSynchronous::Normal)
                .pragma("cache_size", "-64000")
                .pragma("temp_store", "memory")
                .pragma("wal_autocheckpoint", "1000");
        }

        let mut pool = SqlitePoolOptions::new()
            .min_connections(1)
            .acquire_timeout(Duration::from_secs(config.timeout));

        pool = if in_memory {
            // 连接关闭即丢失数据，保持唯一连接常驻
            pool.max_connections(1).idle_timeout(None).max_lifetime(None)
        } else {
            pool.max_connections(config.pool_size)
                .test_before_acquire(true)
                .idle_timeout(Duration::from_secs(300))
        };

        let pool = pool
            .connect_with(opt)
            .await
            .map_err(|e| ClassroomError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &DatabaseConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.pool_size)
            .min_connections(1)
            .connect_timeout(Duration::from_secs(config.timeout))
            .acquire_timeout(Duration::from_secs(config.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false);

        Database::connect(opt)
            .await
            .map_err(|e| ClassroomError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url == ":memory:" {
            Ok("sqlite::memory:".to_string())
        } else if url.starts_with("sqlite:") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") {
            Ok(format!("sqlite://{url}?mode=rwc"))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(ClassroomError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }
}

/// 写操作错误映射：唯一约束冲突为 Conflict，外键不存在为 BadRequest
pub(crate) fn map_write_err(context: &str, e: DbErr) -> ClassroomError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            ClassroomError::conflict(format!("{context}: record already exists"))
        }
        Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
            ClassroomError::bad_request(format!("{context}: referenced record does not exist"))
        }
        _ => ClassroomError::database_operation(format!("{context}: {e}")),
    }
}

// Storage trait 实现
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
use crate::storage::Storage;
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 用户模块
    async fn create_user(&self, user: CreateUser) -> Result<User> {
        self.create_user_impl(user).await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.get_user_by_username_impl(username).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.get_user_by_email_impl(email).await
    }

    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>> {
        self.get_user_by_username_or_email_impl(identifier).await
    }

    async fn update_user(&self, id: i64, update: UpdateUser) -> Result<Option<User>> {
        self.update_user_impl(id, update).await
    }

    async fn set_user_role_if_unset(&self, id: i64, role: UserRole) -> Result<bool> {
        self.set_user_role_if_unset_impl(id, role).await
    }

    async fn update_last_login(&self, id: i64) -> Result<bool> {
        self.update_last_login_impl(id).await
    }

    // 教室模块
    async fn create_classroom(&self, classroom: CreateClassroom) -> Result<Classroom> {
        self.create_classroom_impl(classroom).await
    }

    async fn get_classroom_by_id(&self, classroom_id: i64) -> Result<Option<Classroom>> {
        self.get_classroom_by_id_impl(classroom_id).await
    }

    async fn update_classroom(
        &self,
        classroom_id: i64,
        update: UpdateClassroom,
    ) -> Result<Option<Classroom>> {
        self.update_classroom_impl(classroom_id, update).await
    }

    async fn delete_classroom(&self, classroom_id: i64) -> Result<bool> {
        self.delete_classroom_impl(classroom_id).await
    }

    async fn list_owned_classrooms(
        &self,
        owner_id: i64,
        query: ClassroomListQuery,
    ) -> Result<ClassroomListResponse> {
        self.list_owned_classrooms_impl(owner_id, query).await
    }

    async fn list_enrolled_classrooms(
        &self,
        student_id: i64,
        query: ClassroomListQuery,
    ) -> Result<ClassroomListResponse> {
        self.list_enrolled_classrooms_impl(student_id, query).await
    }

    async fn browse_classrooms(&self, query: ClassroomListQuery) -> Result<ClassroomListResponse> {
        self.browse_classrooms_impl(query).await
    }

    // 选课模块
    async fn enroll_student(&self, classroom_id: i64, student_id: i64) -> Result<Enrollment> {
        self.enroll_student_impl(classroom_id, student_id).await
    }

    async fn unenroll_student(&self, classroom_id: i64, student_id: i64) -> Result<bool> {
        self.unenroll_student_impl(classroom_id, student_id).await
    }

    async fn is_enrolled(&self, classroom_id: i64, student_id: i64) -> Result<bool> {
        self.is_enrolled_impl(classroom_id, student_id).await
    }

    async fn list_classroom_students(
        &self,
        classroom_id: i64,
        page: u64,
        size: u64,
    ) -> Result<ClassroomStudentListResponse> {
        self.list_classroom_students_impl(classroom_id, page, size)
            .await
    }

    // 学科模块
    async fn create_subject(&self, name: &str) -> Result<Subject> {
        self.create_subject_impl(name).await
    }

    async fn get_subject_by_id(&self, subject_id: i64) -> Result<Option<Subject>> {
        self.get_subject_by_id_impl(subject_id).await
    }

    async fn list_subjects(&self) -> Result<Vec<Subject>> {
        self.list_subjects_impl().await
    }

    // 作业模块
    async fn create_assignment(&self, assignment: CreateAssignment) -> Result<Assignment> {
        self.create_assignment_impl(assignment).await
    }

    async fn get_assignment_by_id(&self, assignment_id: i64) -> Result<Option<Assignment>> {
        self.get_assignment_by_id_impl(assignment_id).await
    }

    async fn list_assignments_by_classroom(&self, classroom_id: i64) -> Result<Vec<Assignment>> {
        self.list_assignments_by_classroom_impl(classroom_id).await
    }

    async fn update_assignment(
        &self,
        assignment_id: i64,
        update: UpdateAssignmentRequest,
    ) -> Result<Option<Assignment>> {
        self.update_assignment_impl(assignment_id, update).await
    }

    async fn delete_assignment(&self, assignment_id: i64) -> Result<bool> {
        self.delete_assignment_impl(assignment_id).await
    }

    // 附件模块
    async fn create_attachment(&self, attachment: CreateAttachment) -> Result<Attachment> {
        self.create_attachment_impl(attachment).await
    }

    async fn get_attachment_by_id(&self, attachment_id: i64) -> Result<Option<Attachment>> {
        self.get_attachment_by_id_impl(attachment_id).await
    }

    async fn get_attachment_by_object_key(&self, object_key: &str) -> Result<Option<Attachment>> {
        self.get_attachment_by_object_key_impl(object_key).await
    }

    async fn list_attachments_by_assignment(&self, assignment_id: i64) -> Result<Vec<Attachment>> {
        self.list_attachments_by_assignment_impl(assignment_id)
            .await
    }

    async fn delete_attachment(&self, attachment_id: i64) -> Result<bool> {
        self.delete_attachment_impl(attachment_id).await
    }

    // 提交模块
    async fn create_submission(&self, submission: CreateSubmission) -> Result<Submission> {
        self.create_submission_impl(submission).await
    }

    async fn get_submission_by_id(&self, submission_id: i64) -> Result<Option<Submission>> {
        self.get_submission_by_id_impl(submission_id).await
    }

    async fn get_submission_by_object_key(&self, object_key: &str) -> Result<Option<Submission>> {
        self.get_submission_by_object_key_impl(object_key).await
    }

    async fn list_submissions_by_assignment(
        &self,
        assignment_id: i64,
    ) -> Result<Vec<Submission>> {
        self.list_submissions_by_assignment_impl(assignment_id)
            .await
    }

    async fn list_student_submissions(
        &self,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<Vec<Submission>> {
        self.list_student_submissions_impl(assignment_id, student_id)
            .await
    }

    async fn update_submission_status(
        &self,
        submission_id: i64,
        status: SubmissionStatus,
    ) -> Result<Option<Submission>> {
        self.update_submission_status_impl(submission_id, status)
            .await
    }

    async fn grade_submission(
        &self,
        submission_id: i64,
        grade: f64,
    ) -> Result<Option<Submission>> {
        self.grade_submission_impl(submission_id, grade).await
    }

    async fn delete_submission(&self, submission_id: i64) -> Result<bool> {
        self.delete_submission_impl(submission_id).await
    }

    // 评论模块
    async fn create_comment(
        &self,
        user_id: i64,
        target: CommentTarget,
        content: &str,
    ) -> Result<Comment> {
        self.create_comment_impl(user_id, target, content).await
    }

    async fn get_comment_by_id(&self, comment_id: i64) -> Result<Option<Comment>> {
        self.get_comment_by_id_impl(comment_id).await
    }

    async fn list_comments(&self, target: CommentTarget) -> Result<Vec<Comment>> {
        self.list_comments_impl(target).await
    }

    async fn delete_comment(&self, comment_id: i64) -> Result<bool> {
        self.delete_comment_impl(comment_id).await
    }

    // 评级模块
    async fn upsert_rating(
        &self,
        classroom_id: i64,
        student_id: i64,
        amount: i32,
    ) -> Result<Rating> {
        self.upsert_rating_impl(classroom_id, student_id, amount)
            .await
    }

    async fn get_rating(&self, classroom_id: i64, student_id: i64) -> Result<Option<Rating>> {
        self.get_rating_impl(classroom_id, student_id).await
    }

    async fn list_ratings(&self, classroom_id: i64) -> Result<Vec<Rating>> {
        self.list_ratings_impl(classroom_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_database_url() {
        assert_eq!(
            SeaOrmStorage::build_database_url("classroom.db").unwrap(),
            "sqlite://classroom.db?mode=rwc"
        );
        assert_eq!(
            SeaOrmStorage::build_database_url(":memory:").unwrap(),
            "sqlite::memory:"
        );
        assert!(SeaOrmStorage::build_database_url("postgres://u:p@localhost/db").is_ok());
        assert!(SeaOrmStorage::build_database_url("ftp://nope").is_err());
    }

    #[tokio::test]
    async fn test_in_memory_storage_runs_migrations() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        assert!(storage.list_subjects().await.unwrap().is_empty());
    }
}
