use serde::{Deserialize, Serialize};

/// 评论挂载的对象，二者恰有其一
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentTarget {
    Assignment(i64),
    Submission(i64),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub user_id: i64,
    pub assignment_id: Option<i64>,
    pub submission_id: Option<i64>,
    pub content: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Comment {
    pub fn target(&self) -> Option<CommentTarget> {
        match (self.assignment_id, self.submission_id) {
            (Some(id), None) => Some(CommentTarget::Assignment(id)),
            (None, Some(id)) => Some(CommentTarget::Submission(id)),
            _ => None,
        }
    }
}
