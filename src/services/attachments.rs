use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::guards::assert_is_assignment_admin;
use super::{
    current_user, define_service, delete_object_logged, error_response, get_object_store,
    respond_empty,
};
use crate::errors::{ClassroomError, Result};
use crate::models::users::entities::User;
use crate::object_store::ObjectStore;
use crate::storage::Storage;

define_service!(AttachmentService);

/// 作业管理者删除附件：先删记录，再删对象
pub async fn delete_attachment(
    storage: &Arc<dyn Storage>,
    object_store: &Arc<dyn ObjectStore>,
    actor: &User,
    attachment_id: i64,
) -> Result<()> {
    let attachment = storage
        .get_attachment_by_id(attachment_id)
        .await?
        .ok_or_else(|| ClassroomError::not_found("Attachment not found"))?;
    assert_is_assignment_admin(storage, actor, attachment.assignment_id).await?;

    if !storage.delete_attachment(attachment.id).await? {
        return Err(ClassroomError::not_found("Attachment not found"));
    }
    info!("Attachment {} deleted by {}", attachment.id, actor.id);

    delete_object_logged(object_store, &attachment.object_key).await;
    Ok(())
}

impl AttachmentService {
    pub async fn delete_attachment(
        &self,
        request: &HttpRequest,
        attachment_id: i64,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request);
        let object_store = get_object_store(request);
        let actor = match current_user(request) {
            Ok(user) => user,
            Err(e) => return Ok(error_response(&e)),
        };
        respond_empty(
            delete_attachment(&storage, &object_store, &actor, attachment_id).await,
            "Attachment deleted successfully",
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::attachments::{entities::AttachmentKind, requests::CreateAttachmentRequest};
    use crate::models::classrooms::entities::ClassroomModifier;
    use crate::services::assignments::attachments::create_attachment;
    use crate::test_support;

    #[tokio::test]
    async fn test_delete_attachment_removes_exactly_one() {
        let storage = test_support::storage().await;
        let store = test_support::object_store();
        let object_store = test_support::as_dyn(&store);
        let teacher = test_support::teacher(&storage, "teacher").await;
        let other = test_support::teacher(&storage, "other").await;
        let classroom =
            test_support::classroom(&storage, &teacher, ClassroomModifier::Public, None).await;
        let assignment = test_support::assignment(&storage, classroom.id, None).await;

        let mut created = Vec::new();
        for name in ["task.pdf", "hints.pdf"] {
            let attachment = create_attachment(
                &storage,
                &teacher,
                assignment.id,
                CreateAttachmentRequest {
                    filename: name.to_string(),
                    kind: Some(AttachmentKind::Attachment),
                },
            )
            .await
            .unwrap();
            object_store
                .put(&attachment.object_key, b"%PDF-1.7".to_vec())
                .await
                .unwrap();
            created.push(attachment);
        }
        let (target, kept) = (&created[0], &created[1]);

        let err = delete_attachment(&storage, &object_store, &other, target.id)
            .await
            .unwrap_err();
        assert_eq!(err.transport_code(), "UNAUTHORIZED");
        assert_eq!(store.len(), 2);

        delete_attachment(&storage, &object_store, &teacher, target.id)
            .await
            .unwrap();
        let remaining = storage
            .list_attachments_by_assignment(assignment.id)
            .await
            .unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, kept.id);
        assert!(!store.contains(&target.object_key));
        assert!(store.contains(&kept.object_key));

        let err = delete_attachment(&storage, &object_store, &teacher, target.id)
            .await
            .unwrap_err();
        assert_eq!(err.transport_code(), "NOT_FOUND");
    }
}
