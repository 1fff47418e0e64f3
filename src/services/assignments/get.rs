use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AssignmentService;
use crate::errors::Result;
use crate::models::assignments::{entities::Assignment, responses::AssignmentListResponse};
use crate::models::users::entities::User;
use crate::services::guards::{assert_is_assignment_member, assert_is_classroom_member};
use crate::services::{current_user, error_response, respond};
use crate::storage::Storage;

pub async fn list_assignments(
    storage: &Arc<dyn Storage>,
    actor: &User,
    classroom_id: i64,
) -> Result<AssignmentListResponse> {
    assert_is_classroom_member(storage, actor, classroom_id).await?;
    let items = storage.list_assignments_by_classroom(classroom_id).await?;
    Ok(AssignmentListResponse { items })
}

pub async fn get_assignment(
    storage: &Arc<dyn Storage>,
    actor: &User,
    assignment_id: i64,
) -> Result<Assignment> {
    let (assignment, _, _) = assert_is_assignment_member(storage, actor, assignment_id).await?;
    Ok(assignment)
}

pub async fn handle_list_assignments(
    service: &AssignmentService,
    request: &HttpRequest,
    classroom_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let actor = match current_user(request) {
        Ok(user) => user,
        Err(e) => return Ok(error_response(&e)),
    };
    respond(
        list_assignments(&storage, &actor, classroom_id).await,
        "Assignments retrieved successfully",
    )
}

pub async fn handle_get_assignment(
    service: &AssignmentService,
    request: &HttpRequest,
    assignment_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let actor = match current_user(request) {
        Ok(user) => user,
        Err(e) => return Ok(error_response(&e)),
    };
    respond(
        get_assignment(&storage, &actor, assignment_id).await,
        "Assignment retrieved successfully",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::classrooms::entities::ClassroomModifier;
    use crate::test_support;

    #[tokio::test]
    async fn test_members_only() {
        let storage = test_support::storage().await;
        let teacher = test_support::teacher(&storage, "teacher").await;
        let member = test_support::student(&storage, "member").await;
        let outsider = test_support::student(&storage, "outsider").await;
        let classroom =
            test_support::classroom(&storage, &teacher, ClassroomModifier::Public, None).await;
        test_support::enroll(&storage, classroom.id, member.id).await;
        let assignment = test_support::assignment(&storage, classroom.id, None).await;

        let list = list_assignments(&storage, &member, classroom.id).await.unwrap();
        assert_eq!(list.items.len(), 1);
        assert!(get_assignment(&storage, &teacher, assignment.id).await.is_ok());

        let err = list_assignments(&storage, &outsider, classroom.id)
            .await
            .unwrap_err();
        assert_eq!(err.transport_code(), "UNAUTHORIZED");
        assert!(get_assignment(&storage, &outsider, assignment.id).await.is_err());
    }
}
