use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SubmissionService;
use crate::errors::Result;
use crate::models::submissions::entities::Submission;
use crate::models::users::entities::User;
use crate::services::guards::assert_can_access_submission;
use crate::services::{current_user, error_response, respond};
use crate::storage::Storage;

pub async fn get_submission(
    storage: &Arc<dyn Storage>,
    actor: &User,
    submission_id: i64,
) -> Result<Submission> {
    let (submission, _) = assert_can_access_submission(storage, actor, submission_id).await?;
    Ok(submission)
}

pub async fn handle_get_submission(
    service: &SubmissionService,
    request: &HttpRequest,
    submission_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let actor = match current_user(request) {
        Ok(user) => user,
        Err(e) => return Ok(error_response(&e)),
    };
    respond(
        get_submission(&storage, &actor, submission_id).await,
        "Submission retrieved successfully",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::classrooms::entities::ClassroomModifier;
    use crate::models::submissions::requests::CreateSubmissionRequest;
    use crate::services::assignments::submissions::create_submission;
    use crate::test_support;

    #[tokio::test]
    async fn test_get_submission_access() {
        let storage = test_support::storage().await;
        let teacher = test_support::teacher(&storage, "teacher").await;
        let other_teacher = test_support::teacher(&storage, "other").await;
        let alice = test_support::student(&storage, "alice").await;
        let bob = test_support::student(&storage, "bob").await;
        let classroom =
            test_support::classroom(&storage, &teacher, ClassroomModifier::Public, None).await;
        test_support::enroll(&storage, classroom.id, alice.id).await;
        test_support::enroll(&storage, classroom.id, bob.id).await;
        let assignment = test_support::assignment(&storage, classroom.id, None).await;

        let submission = create_submission(
            &storage,
            &alice,
            assignment.id,
            CreateSubmissionRequest {
                filename: "work.txt".to_string(),
            },
        )
        .await
        .unwrap();

        assert!(get_submission(&storage, &alice, submission.id).await.is_ok());
        assert!(get_submission(&storage, &teacher, submission.id).await.is_ok());
        for outsider in [&bob, &other_teacher] {
            let err = get_submission(&storage, outsider, submission.id)
                .await
                .unwrap_err();
            assert_eq!(err.transport_code(), "UNAUTHORIZED");
        }

        let err = get_submission(&storage, &teacher, submission.id + 100)
            .await
            .unwrap_err();
        assert_eq!(err.transport_code(), "NOT_FOUND");
    }
}
