use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::StatusCode};
use tracing::info;

use super::AssignmentService;
use crate::errors::{ClassroomError, Result};
use crate::models::submissions::{
    entities::{Submission, SubmissionStatus},
    requests::{CreateSubmission, CreateSubmissionRequest},
};
use crate::models::users::entities::User;
use crate::object_store::keys::submission_key;
use crate::services::guards::{assert_is_assignment_admin, assert_is_enrolled};
use crate::services::{current_user, error_response, respond, respond_with};
use crate::storage::Storage;
use crate::utils::validate::sanitize_filename;

/// 作业管理者查看全部提交
pub async fn list_submissions(
    storage: &Arc<dyn Storage>,
    actor: &User,
    assignment_id: i64,
) -> Result<Vec<Submission>> {
    assert_is_assignment_admin(storage, actor, assignment_id).await?;
    storage.list_submissions_by_assignment(assignment_id).await
}

/// 学生自己的提交历史，最新的在前
pub async fn list_my_submissions(
    storage: &Arc<dyn Storage>,
    actor: &User,
    assignment_id: i64,
) -> Result<Vec<Submission>> {
    let assignment = storage
        .get_assignment_by_id(assignment_id)
        .await?
        .ok_or_else(|| ClassroomError::not_found("Assignment not found"))?;
    assert_is_enrolled(storage, actor, assignment.classroom_id).await?;
    storage
        .list_student_submissions(assignment_id, actor.id)
        .await
}

/// 截止后提交记为 late，已关闭的作业拒绝提交；允许多次提交
pub async fn create_submission(
    storage: &Arc<dyn Storage>,
    actor: &User,
    assignment_id: i64,
    request: CreateSubmissionRequest,
) -> Result<Submission> {
    let assignment = storage
        .get_assignment_by_id(assignment_id)
        .await?
        .ok_or_else(|| ClassroomError::not_found("Assignment not found"))?;
    assert_is_enrolled(storage, actor, assignment.classroom_id).await?;

    if assignment.is_closed() {
        return Err(ClassroomError::bad_request(
            "Assignment is closed for submissions",
        ));
    }

    let filename = sanitize_filename(&request.filename)?;
    let is_late = assignment.is_past_due(chrono::Utc::now());
    let status = if is_late {
        SubmissionStatus::Late
    } else {
        SubmissionStatus::Pending
    };

    storage
        .create_submission(CreateSubmission {
            assignment_id,
            student_id: actor.id,
            object_key: submission_key(assignment.classroom_id, assignment_id, actor.id, &filename),
            filename,
            status,
            is_late,
        })
        .await
}

pub async fn handle_list_submissions(
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
        list_submissions(&storage, &actor, assignment_id).await,
        "Submissions retrieved successfully",
    )
}

pub async fn handle_list_my_submissions(
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
        list_my_submissions(&storage, &actor, assignment_id).await,
        "Submissions retrieved successfully",
    )
}

pub async fn handle_create_submission(
    service: &AssignmentService,
    request: &HttpRequest,
    assignment_id: i64,
    body: CreateSubmissionRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let actor = match current_user(request) {
        Ok(user) => user,
        Err(e) => return Ok(error_response(&e)),
    };

    let result = create_submission(&storage, &actor, assignment_id, body).await;
    if let Ok(submission) = &result {
        info!(
            "Student {} submitted {} for assignment {}",
            actor.id, submission.id, assignment_id
        );
    }
    respond_with(
        StatusCode::CREATED,
        result,
        "Submission created, upload the file to its object key",
    )
}
