use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::StatusCode};
use tracing::info;

use super::ClassroomService;
use crate::errors::{ClassroomError, Result};
use crate::models::PaginationQuery;
use crate::models::classrooms::{
    entities::{ClassroomModifier, Enrollment},
    requests::EnrollRequest,
    responses::ClassroomStudentListResponse,
};
use crate::models::users::entities::User;
use crate::services::guards::{
    assert_is_classroom_admin, assert_is_classroom_member, assert_is_enrolled, assert_is_student,
};
use crate::services::{current_user, error_response, respond, respond_empty, respond_with};
use crate::storage::Storage;
use crate::utils::password::verify_password;

/// 学生加入教室：仅 active 教室可加入，私有教室需校验密码
pub async fn enroll(
    storage: &Arc<dyn Storage>,
    actor: &User,
    classroom_id: i64,
    request: EnrollRequest,
) -> Result<Enrollment> {
    assert_is_student(actor)?;

    let classroom = storage
        .get_classroom_by_id(classroom_id)
        .await?
        .ok_or_else(|| ClassroomError::not_found("Classroom not found"))?;

    if !classroom.accepts_enrollment() {
        return Err(ClassroomError::bad_request(format!(
            "Classroom is {} and does not accept enrollments",
            classroom.status
        )));
    }
    if storage.is_enrolled(classroom_id, actor.id).await? {
        return Err(ClassroomError::bad_request(
            "You are already enrolled in this classroom",
        ));
    }

    if classroom.modifier == ClassroomModifier::Private {
        let verified = match (request.password.as_deref(), classroom.password_hash.as_deref()) {
            (Some(password), Some(hash)) => verify_password(password, hash),
            _ => false,
        };
        if !verified {
            return Err(ClassroomError::forbidden("Wrong classroom password"));
        }
    }

    storage
        .enroll_student(classroom_id, actor.id)
        .await
        .map_err(|e| match e {
            ClassroomError::Conflict(_) => {
                ClassroomError::bad_request("You are already enrolled in this classroom")
            }
            other => other,
        })
}

pub async fn leave(storage: &Arc<dyn Storage>, actor: &User, classroom_id: i64) -> Result<()> {
    assert_is_enrolled(storage, actor, classroom_id).await?;
    storage.unenroll_student(classroom_id, actor.id).await?;
    Ok(())
}

pub async fn list_students(
    storage: &Arc<dyn Storage>,
    actor: &User,
    classroom_id: i64,
    pagination: &PaginationQuery,
) -> Result<ClassroomStudentListResponse> {
    assert_is_classroom_member(storage, actor, classroom_id).await?;
    let (page, size) = pagination.normalized();
    storage
        .list_classroom_students(classroom_id, page, size)
        .await
}

pub async fn remove_student(
    storage: &Arc<dyn Storage>,
    actor: &User,
    classroom_id: i64,
    student_id: i64,
) -> Result<()> {
    assert_is_classroom_admin(storage, actor, classroom_id).await?;
    if !storage.unenroll_student(classroom_id, student_id).await? {
        return Err(ClassroomError::not_found(
            "Student is not enrolled in this classroom",
        ));
    }
    Ok(())
}

pub async fn handle_enroll(
    service: &ClassroomService,
    request: &HttpRequest,
    classroom_id: i64,
    body: EnrollRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let actor = match current_user(request) {
        Ok(user) => user,
        Err(e) => return Ok(error_response(&e)),
    };

    let result = enroll(&storage, &actor, classroom_id, body).await;
    if result.is_ok() {
        info!("Student {} enrolled in classroom {}", actor.id, classroom_id);
    }
    respond_with(StatusCode::CREATED, result, "Enrolled successfully")
}

pub async fn handle_leave(
    service: &ClassroomService,
    request: &HttpRequest,
    classroom_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let actor = match current_user(request) {
        Ok(user) => user,
        Err(e) => return Ok(error_response(&e)),
    };
    respond_empty(
        leave(&storage, &actor, classroom_id).await,
        "Left classroom successfully",
    )
}

pub async fn handle_list_students(
    service: &ClassroomService,
    request: &HttpRequest,
    classroom_id: i64,
    query: PaginationQuery,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let actor = match current_user(request) {
        Ok(user) => user,
        Err(e) => return Ok(error_response(&e)),
    };
    respond(
        list_students(&storage, &actor, classroom_id, &query).await,
        "Students retrieved successfully",
    )
}

pub async fn handle_remove_student(
    service: &ClassroomService,
    request: &HttpRequest,
    classroom_id: i64,
    student_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let actor = match current_user(request) {
        Ok(user) => user,
        Err(e) => return Ok(error_response(&e)),
    };
    respond_empty(
        remove_student(&storage, &actor, classroom_id, student_id).await,
        "Student removed successfully",
    )
}
