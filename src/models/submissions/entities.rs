use serde::{Deserialize, Serialize};

use crate::models::define_string_enum;

define_string_enum! {
    SubmissionStatus, "submission status" {
        Pending => "pending",
        Viewed => "viewed",
        Graded => "graded",
        Late => "late",
    }
}

impl SubmissionStatus {
    /// 教师尚未查看
    pub fn is_unseen(&self) -> bool {
        matches!(self, SubmissionStatus::Pending | SubmissionStatus::Late)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    pub id: i64,
    pub assignment_id: i64,
    pub student_id: i64,
    pub filename: String,
    pub object_key: String,
    pub grade: Option<f64>,
    pub status: SubmissionStatus,
    pub is_late: bool,
    pub submitted_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
