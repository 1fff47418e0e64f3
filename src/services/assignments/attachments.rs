use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::StatusCode};

use super::AssignmentService;
use crate::errors::Result;
use crate::models::attachments::{
    entities::{Attachment, AttachmentKind},
    requests::{CreateAttachment, CreateAttachmentRequest},
};
use crate::models::users::entities::User;
use crate::object_store::keys::attachment_key;
use crate::services::guards::{assert_is_assignment_admin, assert_is_assignment_member};
use crate::services::{current_user, error_response, respond, respond_with};
use crate::storage::Storage;
use crate::utils::validate::sanitize_filename;

/// 学生只在作业关闭或截止后看到答案
pub async fn list_attachments(
    storage: &Arc<dyn Storage>,
    actor: &User,
    assignment_id: i64,
) -> Result<Vec<Attachment>> {
    let (assignment, _, is_owner) =
        assert_is_assignment_member(storage, actor, assignment_id).await?;
    let attachments = storage.list_attachments_by_assignment(assignment_id).await?;

    if is_owner || assignment.answers_visible(chrono::Utc::now()) {
        return Ok(attachments);
    }
    Ok(attachments
        .into_iter()
        .filter(|a| a.kind != AttachmentKind::Answer)
        .collect())
}

pub async fn create_attachment(
    storage: &Arc<dyn Storage>,
    actor: &User,
    assignment_id: i64,
    request: CreateAttachmentRequest,
) -> Result<Attachment> {
    let (assignment, classroom) = assert_is_assignment_admin(storage, actor, assignment_id).await?;
    let filename = sanitize_filename(&request.filename)?;

    storage
        .create_attachment(CreateAttachment {
            assignment_id: assignment.id,
            object_key: attachment_key(classroom.id, assignment.id, &filename),
            filename,
            kind: request.kind.unwrap_or(AttachmentKind::Attachment),
        })
        .await
}

pub async fn handle_list_attachments(
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
        list_attachments(&storage, &actor, assignment_id).await,
        "Attachments retrieved successfully",
    )
}

pub async fn handle_create_attachment(
    service: &AssignmentService,
    request: &HttpRequest,
    assignment_id: i64,
    body: CreateAttachmentRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let actor = match current_user(request) {
        Ok(user) => user,
        Err(e) => return Ok(error_response(&e)),
    };
    respond_with(
        StatusCode::CREATED,
        create_attachment(&storage, &actor, assignment_id, body).await,
        "Attachment created, upload the file to its object key",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::classrooms::entities::ClassroomModifier;
    use crate::test_support;
    use chrono::{Duration, Utc};

    fn request(filename: &str, kind: AttachmentKind) -> CreateAttachmentRequest {
        CreateAttachmentRequest {
            filename: filename.to_string(),
            kind: Some(kind),
        }
    }

    #[tokio::test]
    async fn test_create_attachment_issues_key() {
        let storage = test_support::storage().await;
        let teacher = test_support::teacher(&storage, "teacher").await;
        let student = test_support::student(&storage, "student").await;
        let classroom =
            test_support::classroom(&storage, &teacher, ClassroomModifier::Public, None).await;
        test_support::enroll(&storage, classroom.id, student.id).await;
        let assignment = test_support::assignment(&storage, classroom.id, None).await;

        let attachment = create_attachment(
            &storage,
            &teacher,
            assignment.id,
            request("../../etc/notes.pdf", AttachmentKind::Attachment),
        )
        .await
        .unwrap();
        assert_eq!(attachment.filename, "....etcnotes.pdf");
        assert!(attachment.object_key.starts_with(&format!(
            "classrooms/{}/assignments/{}/attachments/",
            classroom.id, assignment.id
        )));

        let err = create_attachment(
            &storage,
            &student,
            assignment.id,
            request("notes.pdf", AttachmentKind::Attachment),
        )
        .await
        .unwrap_err();
        assert_eq!(err.transport_code(), "UNAUTHORIZED");
    }

    #[tokio::test]
    async fn test_answers_filtered_for_students() {
        let storage = test_support::storage().await;
        let teacher = test_support::teacher(&storage, "teacher").await;
        let student = test_support::student(&storage, "student").await;
        let classroom =
            test_support::classroom(&storage, &teacher, ClassroomModifier::Public, None).await;
        test_support::enroll(&storage, classroom.id, student.id).await;
        let open = test_support::assignment(
            &storage,
            classroom.id,
            Some(Utc::now() + Duration::days(1)),
        )
        .await;
        let past = test_support::assignment(
            &storage,
            classroom.id,
            Some(Utc::now() - Duration::days(1)),
        )
        .await;

        for assignment in [&open, &past] {
            for (name, kind) in [
                ("task.pdf", AttachmentKind::Attachment),
                ("answer.pdf", AttachmentKind::Answer),
            ] {
                create_attachment(&storage, &teacher, assignment.id, request(name, kind))
                    .await
                    .unwrap();
            }
        }

        assert_eq!(
            list_attachments(&storage, &teacher, open.id).await.unwrap().len(),
            2
        );
        let visible = list_attachments(&storage, &student, open.id).await.unwrap();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].kind, AttachmentKind::Attachment);
        assert_eq!(
            list_attachments(&storage, &student, past.id).await.unwrap().len(),
            2
        );
    }
}
