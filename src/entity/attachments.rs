//! 作业附件实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "attachments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub assignment_id: i64,
    pub filename: String,
    #[sea_orm(unique)]
    pub object_key: String,
    pub kind: String,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::assignments::Entity",
        from = "Column::AssignmentId",
        to = "super::assignments::Column::Id"
    )]
    Assignment,
}

impl Related<super::assignments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assignment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_attachment(self) -> crate::models::attachments::entities::Attachment {
        use crate::models::attachments::entities::{Attachment, AttachmentKind};
        use chrono::{DateTime, Utc};

        Attachment {
            id: self.id,
            assignment_id: self.assignment_id,
            filename: self.filename,
            object_key: self.object_key,
            kind: self
                .kind
                .parse::<AttachmentKind>()
                .unwrap_or(AttachmentKind::Attachment),
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
        }
    }
}
