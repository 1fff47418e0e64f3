use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::header};

use super::StorageService;
use crate::errors::{ClassroomError, Result};
use crate::models::attachments::entities::AttachmentKind;
use crate::models::users::entities::User;
use crate::object_store::keys::{ObjectKeyKind, parse_object_key};
use crate::object_store::{ObjectStore, validate_object_key};
use crate::services::guards::{assert_can_access_submission, assert_is_assignment_member};
use crate::services::{current_user, error_response, get_object_store};
use crate::storage::Storage;
use crate::utils::file_magic::{content_type_for, extension_of};

#[derive(Debug)]
pub struct DownloadedObject {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl DownloadedObject {
    fn into_response(self) -> HttpResponse {
        let content_type = extension_of(&self.filename)
            .map(|ext| content_type_for(&ext))
            .unwrap_or("application/octet-stream");
        // 使用记录中的原始文件名
        HttpResponse::Ok()
            .insert_header((header::CONTENT_TYPE, content_type))
            .insert_header((
                header::CONTENT_DISPOSITION,
                format!(
                    "attachment; filename=\"{}\"",
                    self.filename.replace('"', "")
                ),
            ))
            .body(self.bytes)
    }
}

async fn fetch_object(
    object_store: &Arc<dyn ObjectStore>,
    key: &str,
    filename: String,
) -> Result<DownloadedObject> {
    let bytes = object_store
        .get(key)
        .await?
        .ok_or_else(|| ClassroomError::not_found("File has not been uploaded yet"))?;
    Ok(DownloadedObject { filename, bytes })
}

fn avatar_filename(key: &str) -> String {
    key.rsplit('/').next().unwrap_or(key).to_string()
}

/// 附件：教室成员（学生看答案需等作业关闭或截止）；提交：提交者或作业管理者
pub async fn download_object(
    storage: &Arc<dyn Storage>,
    object_store: &Arc<dyn ObjectStore>,
    actor: &User,
    key: &str,
) -> Result<DownloadedObject> {
    validate_object_key(key)?;

    match parse_object_key(key) {
        Some(ObjectKeyKind::Attachment { .. }) => {
            let attachment = storage
                .get_attachment_by_object_key(key)
                .await?
                .ok_or_else(|| ClassroomError::not_found("Attachment not found"))?;
            let (assignment, _, is_owner) =
                assert_is_assignment_member(storage, actor, attachment.assignment_id).await?;
            if !is_owner
                && attachment.kind == AttachmentKind::Answer
                && !assignment.answers_visible(chrono::Utc::now())
            {
                return Err(ClassroomError::forbidden("Answers are not available yet"));
            }
            fetch_object(object_store, key, attachment.filename).await
        }
        Some(ObjectKeyKind::Submission { .. }) => {
            let submission = storage
                .get_submission_by_object_key(key)
                .await?
                .ok_or_else(|| ClassroomError::not_found("Submission not found"))?;
            let (submission, _) = assert_can_access_submission(storage, actor, submission.id).await?;
            fetch_object(object_store, key, submission.filename).await
        }
        Some(ObjectKeyKind::Avatar { .. }) => {
            fetch_object(object_store, key, avatar_filename(key)).await
        }
        None => Err(ClassroomError::not_found("Object not found")),
    }
}

/// 公开下载只开放头像
pub async fn download_public_object(
    object_store: &Arc<dyn ObjectStore>,
    key: &str,
) -> Result<DownloadedObject> {
    validate_object_key(key)?;
    match parse_object_key(key) {
        Some(ObjectKeyKind::Avatar { .. }) => {
            fetch_object(object_store, key, avatar_filename(key)).await
        }
        _ => Err(ClassroomError::not_found("Object not found")),
    }
}

pub async fn handle_download(
    service: &StorageService,
    request: &HttpRequest,
    key: String,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let object_store = get_object_store(request);
    let actor = match current_user(request) {
        Ok(user) => user,
        Err(e) => return Ok(error_response(&e)),
    };

    match download_object(&storage, &object_store, &actor, &key).await {
        Ok(object) => Ok(object.into_response()),
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn handle_download_public(
    _service: &StorageService,
    request: &HttpRequest,
    key: String,
) -> ActixResult<HttpResponse> {
    let object_store = get_object_store(request);
    match download_public_object(&object_store, &key).await {
        Ok(object) => Ok(object.into_response()),
        Err(e) => Ok(error_response(&e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::assignments::requests::UpdateAssignmentRequest;
    use crate::models::assignments::entities::AssignmentStatus;
    use crate::models::attachments::requests::CreateAttachment;
    use crate::models::classrooms::entities::ClassroomModifier;
    use crate::object_store::keys::{attachment_key, avatar_key};
    use crate::test_support;

    #[tokio::test]
    async fn test_answer_hidden_until_closed() {
        let storage = test_support::storage().await;
        let store = test_support::object_store();
        let object_store = test_support::as_dyn(&store);
        let owner = test_support::teacher(&storage, "owner").await;
        let alice = test_support::student(&storage, "alice").await;
        let outsider = test_support::student(&storage, "outsider").await;
        let classroom =
            test_support::classroom(&storage, &owner, ClassroomModifier::Public, None).await;
        test_support::enroll(&storage, classroom.id, alice.id).await;
        let assignment = test_support::assignment(&storage, classroom.id, None).await;

        let key = attachment_key(classroom.id, assignment.id, "answers.txt");
        storage
            .create_attachment(CreateAttachment {
                assignment_id: assignment.id,
                filename: "answers.txt".to_string(),
                object_key: key.clone(),
                kind: AttachmentKind::Answer,
            })
            .await
            .unwrap();
        object_store.put(&key, b"42".to_vec()).await.unwrap();

        let object = download_object(&storage, &object_store, &owner, &key)
            .await
            .unwrap();
        assert_eq!(object.bytes, b"42");

        let err = download_object(&storage, &object_store, &alice, &key)
            .await
            .unwrap_err();
        assert_eq!(err.transport_code(), "FORBIDDEN");

        let err = download_object(&storage, &object_store, &outsider, &key)
            .await
            .unwrap_err();
        assert_eq!(err.transport_code(), "UNAUTHORIZED");

        storage
            .update_assignment(
                assignment.id,
                UpdateAssignmentRequest {
                    status: Some(AssignmentStatus::Closed),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let object = download_object(&storage, &object_store, &alice, &key)
            .await
            .unwrap();
        assert_eq!(object.filename, "answers.txt");
    }

    #[tokio::test]
    async fn test_public_download_only_avatars() {
        let store = test_support::object_store();
        let object_store = test_support::as_dyn(&store);

        let avatar = avatar_key(1, "png");
        object_store.put(&avatar, vec![1, 2, 3]).await.unwrap();
        let attachment = attachment_key(1, 1, "notes.pdf");
        object_store.put(&attachment, vec![4]).await.unwrap();

        let object = download_public_object(&object_store, &avatar).await.unwrap();
        assert_eq!(object.bytes, vec![1, 2, 3]);

        let err = download_public_object(&object_store, &attachment)
            .await
            .unwrap_err();
        assert_eq!(err.transport_code(), "NOT_FOUND");
    }
}
