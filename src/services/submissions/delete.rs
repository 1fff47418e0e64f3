use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::SubmissionService;
use crate::errors::{ClassroomError, Result};
use crate::models::users::entities::User;
use crate::object_store::ObjectStore;
use crate::services::{
    current_user, delete_object_logged, error_response, get_object_store, respond_empty,
};
use crate::storage::Storage;

/// 仅提交者本人可撤回提交；先删记录再删对象
pub async fn delete_submission(
    storage: &Arc<dyn Storage>,
    object_store: &Arc<dyn ObjectStore>,
    actor: &User,
    submission_id: i64,
) -> Result<()> {
    let submission = storage
        .get_submission_by_id(submission_id)
        .await?
        .ok_or_else(|| ClassroomError::not_found("Submission not found"))?;

    if submission.student_id != actor.id {
        return Err(ClassroomError::forbidden(
            "Only the submitting student can delete this submission",
        ));
    }

    if !storage.delete_submission(submission.id).await? {
        return Err(ClassroomError::not_found("Submission not found"));
    }
    info!("Submission {} deleted by {}", submission.id, actor.id);

    delete_object_logged(object_store, &submission.object_key).await;
    Ok(())
}

pub async fn handle_delete_submission(
    service: &SubmissionService,
    request: &HttpRequest,
    submission_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let object_store = get_object_store(request);
    let actor = match current_user(request) {
        Ok(user) => user,
        Err(e) => return Ok(error_response(&e)),
    };
    respond_empty(
        delete_submission(&storage, &object_store, &actor, submission_id).await,
        "Submission deleted successfully",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::classrooms::entities::ClassroomModifier;
    use crate::test_support;

    #[tokio::test]
    async fn test_delete_submission_removes_row_and_object() {
        let storage = test_support::storage().await;
        let store = test_support::object_store();
        let object_store = test_support::as_dyn(&store);
        let teacher = test_support::teacher(&storage, "teacher").await;
        let student = test_support::student(&storage, "student").await;
        let classroom =
            test_support::classroom(&storage, &teacher, ClassroomModifier::Public, None).await;
        test_support::enroll(&storage, classroom.id, student.id).await;
        let assignment = test_support::assignment(&storage, classroom.id, None).await;

        let target = test_support::submission(&storage, &assignment, student.id, "a.pdf").await;
        let kept = test_support::submission(&storage, &assignment, student.id, "b.pdf").await;
        for s in [&target, &kept] {
            object_store.put(&s.object_key, vec![1, 2, 3]).await.unwrap();
        }

        // 教师也无权删除学生的提交
        let err = delete_submission(&storage, &object_store, &teacher, target.id)
            .await
            .unwrap_err();
        assert_eq!(err.transport_code(), "FORBIDDEN");
        assert_eq!(store.len(), 2);

        delete_submission(&storage, &object_store, &student, target.id)
            .await
            .unwrap();
        assert!(
            storage
                .get_submission_by_id(target.id)
                .await
                .unwrap()
                .is_none()
        );
        assert!(
            storage
                .get_submission_by_id(kept.id)
                .await
                .unwrap()
                .is_some()
        );
        assert!(!store.contains(&target.object_key));
        assert!(store.contains(&kept.object_key));
    }

    #[tokio::test]
    async fn test_delete_without_object_still_succeeds() {
        let storage = test_support::storage().await;
        let object_store = test_support::as_dyn(&test_support::object_store());
        let teacher = test_support::teacher(&storage, "teacher").await;
        let student = test_support::student(&storage, "student").await;
        let classroom =
            test_support::classroom(&storage, &teacher, ClassroomModifier::Public, None).await;
        let assignment = test_support::assignment(&storage, classroom.id, None).await;
        let submission =
            test_support::submission(&storage, &assignment, student.id, "never-uploaded.pdf")
                .await;

        delete_submission(&storage, &object_store, &student, submission.id)
            .await
            .unwrap();
    }
}
