use super::entities::AttachmentKind;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct CreateAttachmentRequest {
    pub filename: String,
    pub kind: Option<AttachmentKind>,
}

// 附件创建（用于存储层）
#[derive(Debug, Clone)]
pub struct CreateAttachment {
    pub assignment_id: i64,
    pub filename: String,
    pub object_key: String,
    pub kind: AttachmentKind,
}
