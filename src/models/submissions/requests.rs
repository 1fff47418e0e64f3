use super::entities::SubmissionStatus;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct CreateSubmissionRequest {
    pub filename: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GradeSubmissionRequest {
    pub grade: f64,
}

// 提交创建（用于存储层）
#[derive(Debug, Clone)]
pub struct CreateSubmission {
    pub assignment_id: i64,
    pub student_id: i64,
    pub filename: String,
    pub object_key: String,
    pub status: SubmissionStatus,
    pub is_late: bool,
}
