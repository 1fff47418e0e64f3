use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::AssignmentService;
use crate::errors::{ClassroomError, Result};
use crate::models::users::entities::User;
use crate::object_store::ObjectStore;
use crate::object_store::keys::assignment_prefix;
use crate::services::guards::assert_is_assignment_admin;
use crate::services::{
    current_user, delete_prefix_logged, error_response, get_object_store, respond_empty,
};
use crate::storage::Storage;

/// 删除作业（级联删除附件、提交、评论），再尽力清理其对象
pub async fn delete_assignment(
    storage: &Arc<dyn Storage>,
    object_store: &Arc<dyn ObjectStore>,
    actor: &User,
    assignment_id: i64,
) -> Result<()> {
    let (assignment, classroom) = assert_is_assignment_admin(storage, actor, assignment_id).await?;

    if !storage.delete_assignment(assignment.id).await? {
        return Err(ClassroomError::not_found("Assignment not found"));
    }
    info!("Assignment {} deleted by {}", assignment.id, actor.id);

    delete_prefix_logged(object_store, &assignment_prefix(classroom.id, assignment.id)).await;
    Ok(())
}

pub async fn handle_delete_assignment(
    service: &AssignmentService,
    request: &HttpRequest,
    assignment_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let object_store = get_object_store(request);
    let actor = match current_user(request) {
        Ok(user) => user,
        Err(e) => return Ok(error_response(&e)),
    };
    respond_empty(
        delete_assignment(&storage, &object_store, &actor, assignment_id).await,
        "Assignment deleted successfully",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::classrooms::entities::ClassroomModifier;
    use crate::object_store::keys::{attachment_key, submission_key};
    use crate::test_support;

    #[tokio::test]
    async fn test_delete_assignment_cleans_objects() {
        let storage = test_support::storage().await;
        let store = test_support::object_store();
        let object_store = test_support::as_dyn(&store);
        let teacher = test_support::teacher(&storage, "teacher").await;
        let other = test_support::teacher(&storage, "other").await;
        let classroom =
            test_support::classroom(&storage, &teacher, ClassroomModifier::Public, None).await;
        let assignment = test_support::assignment(&storage, classroom.id, None).await;
        let sibling = test_support::assignment(&storage, classroom.id, None).await;

        let removed = attachment_key(classroom.id, assignment.id, "a.pdf");
        let removed_submission = submission_key(classroom.id, assignment.id, 5, "b.pdf");
        let kept = attachment_key(classroom.id, sibling.id, "c.pdf");
        for key in [&removed, &removed_submission, &kept] {
            object_store.put(key, vec![0]).await.unwrap();
        }

        let err = delete_assignment(&storage, &object_store, &other, assignment.id)
            .await
            .unwrap_err();
        assert_eq!(err.transport_code(), "UNAUTHORIZED");
        assert_eq!(store.len(), 3);

        delete_assignment(&storage, &object_store, &teacher, assignment.id)
            .await
            .unwrap();
        assert!(
            storage
                .get_assignment_by_id(assignment.id)
                .await
                .unwrap()
                .is_none()
        );
        assert_eq!(store.len(), 1);
        assert!(store.contains(&kept));
    }
}
