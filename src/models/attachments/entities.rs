use serde::{Deserialize, Serialize};

use crate::models::define_string_enum;

define_string_enum! {
    AttachmentKind, "attachment kind" {
        Attachment => "attachment",
        Answer => "answer",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attachment {
    pub id: i64,
    pub assignment_id: i64,
    pub filename: String,
    pub object_key: String,
    pub kind: AttachmentKind,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
