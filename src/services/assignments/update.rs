use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AssignmentService;
use super::create::ensure_subject_exists;
use crate::errors::{ClassroomError, Result};
use crate::models::assignments::{entities::Assignment, requests::UpdateAssignmentRequest};
use crate::models::users::entities::User;
use crate::services::guards::assert_is_assignment_admin;
use crate::services::{current_user, error_response, respond};
use crate::storage::Storage;
use crate::utils::validate::{validate_name, validate_text};

pub async fn update_assignment(
    storage: &Arc<dyn Storage>,
    actor: &User,
    assignment_id: i64,
    mut request: UpdateAssignmentRequest,
) -> Result<Assignment> {
    assert_is_assignment_admin(storage, actor, assignment_id).await?;

    request.name = request
        .name
        .as_deref()
        .map(|n| validate_name("Assignment name", n))
        .transpose()?;
    request.description = request
        .description
        .as_deref()
        .map(|d| validate_text("Description", d))
        .transpose()?;
    ensure_subject_exists(storage, request.subject_id).await?;

    storage
        .update_assignment(assignment_id, request)
        .await?
        .ok_or_else(|| ClassroomError::not_found("Assignment not found"))
}

pub async fn handle_update_assignment(
    service: &AssignmentService,
    request: &HttpRequest,
    assignment_id: i64,
    body: UpdateAssignmentRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let actor = match current_user(request) {
        Ok(user) => user,
        Err(e) => return Ok(error_response(&e)),
    };
    respond(
        update_assignment(&storage, &actor, assignment_id, body).await,
        "Assignment updated successfully",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::assignments::entities::AssignmentStatus;
    use crate::models::classrooms::entities::ClassroomModifier;
    use crate::test_support;

    #[tokio::test]
    async fn test_update_assignment() {
        let storage = test_support::storage().await;
        let teacher = test_support::teacher(&storage, "teacher").await;
        let student = test_support::student(&storage, "student").await;
        let classroom =
            test_support::classroom(&storage, &teacher, ClassroomModifier::Public, None).await;
        test_support::enroll(&storage, classroom.id, student.id).await;
        let assignment = test_support::assignment(&storage, classroom.id, None).await;

        let err = update_assignment(
            &storage,
            &student,
            assignment.id,
            UpdateAssignmentRequest {
                status: Some(AssignmentStatus::Closed),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.transport_code(), "UNAUTHORIZED");

        let updated = update_assignment(
            &storage,
            &teacher,
            assignment.id,
            UpdateAssignmentRequest {
                name: Some(" Final essay ".to_string()),
                status: Some(AssignmentStatus::Closed),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.name, "Final essay");
        assert!(updated.is_closed());
    }
}
