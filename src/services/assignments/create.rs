use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::StatusCode};
use tracing::info;

use super::AssignmentService;
use crate::errors::{ClassroomError, Result};
use crate::models::assignments::{
    entities::{Assignment, AssignmentStatus},
    requests::{CreateAssignment, CreateAssignmentRequest},
};
use crate::models::users::entities::User;
use crate::services::guards::assert_is_classroom_admin;
use crate::services::{current_user, error_response, respond_with};
use crate::storage::Storage;
use crate::utils::validate::{validate_name, validate_text};

/// 学科必须存在
pub(crate) async fn ensure_subject_exists(
    storage: &Arc<dyn Storage>,
    subject_id: Option<i64>,
) -> Result<()> {
    if let Some(subject_id) = subject_id
        && storage.get_subject_by_id(subject_id).await?.is_none()
    {
        return Err(ClassroomError::bad_request(format!(
            "Subject {subject_id} does not exist"
        )));
    }
    Ok(())
}

pub async fn create_assignment(
    storage: &Arc<dyn Storage>,
    actor: &User,
    classroom_id: i64,
    request: CreateAssignmentRequest,
) -> Result<Assignment> {
    assert_is_classroom_admin(storage, actor, classroom_id).await?;

    let name = validate_name("Assignment name", &request.name)?;
    let description = request
        .description
        .as_deref()
        .map(|d| validate_text("Description", d))
        .transpose()?;
    ensure_subject_exists(storage, request.subject_id).await?;

    storage
        .create_assignment(CreateAssignment {
            classroom_id,
            subject_id: request.subject_id,
            name,
            description,
            due_date: request.due_date,
            status: request.status.unwrap_or(AssignmentStatus::Open),
        })
        .await
}

pub async fn handle_create_assignment(
    service: &AssignmentService,
    request: &HttpRequest,
    classroom_id: i64,
    body: CreateAssignmentRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let actor = match current_user(request) {
        Ok(user) => user,
        Err(e) => return Ok(error_response(&e)),
    };

    let result = create_assignment(&storage, &actor, classroom_id, body).await;
    if let Ok(assignment) = &result {
        info!(
            "Assignment {} created in classroom {}",
            assignment.id, classroom_id
        );
    }
    respond_with(StatusCode::CREATED, result, "Assignment created successfully")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::classrooms::entities::ClassroomModifier;
    use crate::test_support;

    fn request(subject_id: Option<i64>) -> CreateAssignmentRequest {
        CreateAssignmentRequest {
            name: "Essay".to_string(),
            description: None,
            subject_id,
            due_date: None,
            status: None,
        }
    }

    #[tokio::test]
    async fn test_create_assignment() {
        let storage = test_support::storage().await;
        let teacher = test_support::teacher(&storage, "teacher").await;
        let other = test_support::teacher(&storage, "other").await;
        let classroom =
            test_support::classroom(&storage, &teacher, ClassroomModifier::Public, None).await;
        let subject = storage.create_subject("History").await.unwrap();

        let assignment = create_assignment(&storage, &teacher, classroom.id, request(Some(subject.id)))
            .await
            .unwrap();
        assert_eq!(assignment.classroom_id, classroom.id);
        assert_eq!(assignment.subject_id, Some(subject.id));
        assert_eq!(assignment.status, AssignmentStatus::Open);

        let err = create_assignment(&storage, &teacher, classroom.id, request(Some(9999)))
            .await
            .unwrap_err();
        assert_eq!(err.transport_code(), "BAD_REQUEST");

        let err = create_assignment(&storage, &other, classroom.id, request(None))
            .await
            .unwrap_err();
        assert_eq!(err.transport_code(), "UNAUTHORIZED");
        assert_eq!(
            storage
                .list_assignments_by_classroom(classroom.id)
                .await
                .unwrap()
                .len(),
            1
        );
    }
}
