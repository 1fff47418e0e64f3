//! 教师查看与批改提交
//!
//! 状态流转：`pending`/`late` --view--> `viewed` --grade--> `graded`，
//! `graded` 可以重新批改。

use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::SubmissionService;
use crate::errors::{ClassroomError, Result};
use crate::models::submissions::{
    entities::{Submission, SubmissionStatus},
    requests::GradeSubmissionRequest,
};
use crate::models::users::entities::User;
use crate::services::guards::assert_is_assignment_admin;
use crate::services::{current_user, error_response, respond};
use crate::storage::Storage;

const MIN_GRADE: f64 = 0.0;
const MAX_GRADE: f64 = 100.0;

async fn admin_submission(
    storage: &Arc<dyn Storage>,
    actor: &User,
    submission_id: i64,
) -> Result<Submission> {
    let submission = storage
        .get_submission_by_id(submission_id)
        .await?
        .ok_or_else(|| ClassroomError::not_found("Submission not found"))?;
    assert_is_assignment_admin(storage, actor, submission.assignment_id).await?;
    Ok(submission)
}

pub async fn view_submission(
    storage: &Arc<dyn Storage>,
    actor: &User,
    submission_id: i64,
) -> Result<Submission> {
    let submission = admin_submission(storage, actor, submission_id).await?;
    if !submission.status.is_unseen() {
        return Ok(submission);
    }

    storage
        .update_submission_status(submission_id, SubmissionStatus::Viewed)
        .await?
        .ok_or_else(|| ClassroomError::not_found("Submission not found"))
}

pub async fn grade_submission(
    storage: &Arc<dyn Storage>,
    actor: &User,
    submission_id: i64,
    request: GradeSubmissionRequest,
) -> Result<Submission> {
    let submission = admin_submission(storage, actor, submission_id).await?;

    if !(MIN_GRADE..=MAX_GRADE).contains(&request.grade) {
        return Err(ClassroomError::validation(format!(
            "Grade must be between {MIN_GRADE} and {MAX_GRADE}"
        )));
    }
    if submission.status.is_unseen() {
        return Err(ClassroomError::bad_request(
            "Submission must be viewed before grading",
        ));
    }

    let graded = storage
        .grade_submission(submission_id, request.grade)
        .await?
        .ok_or_else(|| ClassroomError::not_found("Submission not found"))?;
    info!(
        "Submission {} graded {} by {}",
        submission_id, request.grade, actor.id
    );
    Ok(graded)
}

pub async fn handle_view_submission(
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
        view_submission(&storage, &actor, submission_id).await,
        "Submission viewed",
    )
}

pub async fn handle_grade_submission(
    service: &SubmissionService,
    request: &HttpRequest,
    submission_id: i64,
    body: GradeSubmissionRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let actor = match current_user(request) {
        Ok(user) => user,
        Err(e) => return Ok(error_response(&e)),
    };
    respond(
        grade_submission(&storage, &actor, submission_id, body).await,
        "Submission graded successfully",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::classrooms::entities::ClassroomModifier;
    use crate::test_support;

    fn grade(value: f64) -> GradeSubmissionRequest {
        GradeSubmissionRequest { grade: value }
    }

    #[tokio::test]
    async fn test_grade_requires_view() {
        let storage = test_support::storage().await;
        let teacher = test_support::teacher(&storage, "teacher").await;
        let student = test_support::student(&storage, "student").await;
        let classroom =
            test_support::classroom(&storage, &teacher, ClassroomModifier::Public, None).await;
        test_support::enroll(&storage, classroom.id, student.id).await;
        let assignment = test_support::assignment(&storage, classroom.id, None).await;
        let submission =
            test_support::submission(&storage, &assignment, student.id, "work.pdf").await;

        let err = grade_submission(&storage, &teacher, submission.id, grade(90.0))
            .await
            .unwrap_err();
        assert_eq!(err.transport_code(), "BAD_REQUEST");
        let unchanged = storage
            .get_submission_by_id(submission.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(unchanged.status, SubmissionStatus::Pending);
        assert!(unchanged.grade.is_none());

        let viewed = view_submission(&storage, &teacher, submission.id)
            .await
            .unwrap();
        assert_eq!(viewed.status, SubmissionStatus::Viewed);

        let graded = grade_submission(&storage, &teacher, submission.id, grade(90.0))
            .await
            .unwrap();
        assert_eq!(graded.status, SubmissionStatus::Graded);
        assert_eq!(graded.grade, Some(90.0));

        // 重新批改
        let regraded = grade_submission(&storage, &teacher, submission.id, grade(75.5))
            .await
            .unwrap();
        assert_eq!(regraded.grade, Some(75.5));

        // 已批改的提交再次查看不回退状态
        let still_graded = view_submission(&storage, &teacher, submission.id)
            .await
            .unwrap();
        assert_eq!(still_graded.status, SubmissionStatus::Graded);
    }

    #[tokio::test]
    async fn test_grade_range_and_permissions() {
        let storage = test_support::storage().await;
        let teacher = test_support::teacher(&storage, "teacher").await;
        let other = test_support::teacher(&storage, "other").await;
        let student = test_support::student(&storage, "student").await;
        let classroom =
            test_support::classroom(&storage, &teacher, ClassroomModifier::Public, None).await;
        test_support::enroll(&storage, classroom.id, student.id).await;
        let assignment = test_support::assignment(&storage, classroom.id, None).await;
        let submission =
            test_support::submission(&storage, &assignment, student.id, "work.pdf").await;

        for actor in [&other, &student] {
            let err = view_submission(&storage, actor, submission.id)
                .await
                .unwrap_err();
            assert_eq!(err.transport_code(), "UNAUTHORIZED");
        }

        view_submission(&storage, &teacher, submission.id)
            .await
            .unwrap();
        for value in [-1.0, 100.5] {
            let err = grade_submission(&storage, &teacher, submission.id, grade(value))
                .await
                .unwrap_err();
            assert_eq!(err.transport_code(), "BAD_REQUEST");
        }
        let err = grade_submission(&storage, &other, submission.id, grade(50.0))
            .await
            .unwrap_err();
        assert_eq!(err.transport_code(), "UNAUTHORIZED");
    }
}
