use std::sync::Arc;

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use futures_util::TryStreamExt;
use futures_util::stream::StreamExt;
use tracing::info;

use super::StorageService;
use crate::config::{AppConfig, ObjectStoreConfig};
use crate::errors::{ClassroomError, Result};
use crate::models::objects::responses::ObjectUploadResponse;
use crate::models::users::entities::User;
use crate::object_store::keys::{ObjectKeyKind, parse_object_key};
use crate::object_store::{ObjectStore, validate_object_key};
use crate::services::guards::assert_is_assignment_admin;
use crate::services::{current_user, error_response, get_object_store, respond};
use crate::storage::Storage;
use crate::utils::file_magic::extension_of;
use crate::utils::validate_magic_bytes;

/// 上传限制
#[derive(Debug, Clone)]
pub struct UploadPolicy {
    pub max_size: usize,
    /// 小写且带点号的扩展名
    pub allowed_types: Vec<String>,
}

impl UploadPolicy {
    pub fn from_config(config: &ObjectStoreConfig) -> Self {
        Self {
            max_size: config.max_size,
            allowed_types: config
                .allowed_types
                .iter()
                .map(|t| t.to_ascii_lowercase())
                .collect(),
        }
    }

    /// 校验大小、扩展名与文件头，返回扩展名
    pub fn check(&self, filename: &str, bytes: &[u8]) -> Result<String> {
        if bytes.is_empty() {
            return Err(ClassroomError::bad_request("Uploaded file is empty"));
        }
        if bytes.len() > self.max_size {
            return Err(ClassroomError::bad_request("File size exceeds the limit"));
        }

        let extension = extension_of(filename)
            .filter(|ext| self.allowed_types.contains(ext))
            .ok_or_else(|| ClassroomError::bad_request("File type not allowed"))?;

        if !validate_magic_bytes(bytes, &extension) {
            return Err(ClassroomError::bad_request(
                "File content does not match its extension",
            ));
        }
        Ok(extension)
    }
}

/// multipart 中名为 `file` 的唯一文件
#[derive(Debug)]
pub struct UploadedFile {
    pub filename: Option<String>,
    pub bytes: Vec<u8>,
}

/// 读取 multipart 负载，超出大小限制时立即停止
pub async fn read_single_file(mut payload: Multipart, max_size: usize) -> Result<UploadedFile> {
    let mut uploaded: Option<UploadedFile> = None;

    while let Some(mut field) = payload
        .try_next()
        .await
        .map_err(|e| ClassroomError::bad_request(format!("Invalid multipart payload: {e}")))?
    {
        let content_disposition = field.content_disposition();
        let name = content_disposition
            .and_then(|cd| cd.get_name())
            .unwrap_or_default()
            .to_string();

        if name != "file" {
            continue;
        }
        if uploaded.is_some() {
            return Err(ClassroomError::bad_request(
                "Only one file can be uploaded at a time",
            ));
        }

        let filename = content_disposition
            .and_then(|cd| cd.get_filename())
            .map(|s| s.to_string());

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let data = chunk.map_err(|e| {
                ClassroomError::bad_request(format!("Failed to read upload: {e}"))
            })?;
            if bytes.len() + data.len() > max_size {
                return Err(ClassroomError::bad_request("File size exceeds the limit"));
            }
            bytes.extend_from_slice(&data);
        }

        uploaded = Some(UploadedFile { filename, bytes });
    }

    uploaded.ok_or_else(|| ClassroomError::bad_request("No file found in upload payload"))
}

/// 只有能写入对应记录的用户可以上传：附件为作业管理者，提交为提交者本人
async fn authorize_upload(storage: &Arc<dyn Storage>, actor: &User, key: &str) -> Result<()> {
    match parse_object_key(key) {
        Some(ObjectKeyKind::Attachment {
            classroom_id,
            assignment_id,
        }) => {
            let attachment = storage
                .get_attachment_by_object_key(key)
                .await?
                .ok_or_else(|| ClassroomError::not_found("No attachment is waiting for this key"))?;
            let (assignment, classroom) =
                assert_is_assignment_admin(storage, actor, attachment.assignment_id).await?;
            if assignment.id != assignment_id || classroom.id != classroom_id {
                return Err(ClassroomError::bad_request(
                    "Object key does not match its attachment",
                ));
            }
            Ok(())
        }
        Some(ObjectKeyKind::Submission {
            assignment_id,
            student_id,
            ..
        }) => {
            let submission = storage
                .get_submission_by_object_key(key)
                .await?
                .ok_or_else(|| ClassroomError::not_found("No submission is waiting for this key"))?;
            if submission.student_id != actor.id || student_id != actor.id {
                return Err(ClassroomError::forbidden(
                    "Only the submitting student can upload this file",
                ));
            }
            if submission.assignment_id != assignment_id {
                return Err(ClassroomError::bad_request(
                    "Object key does not match its submission",
                ));
            }
            Ok(())
        }
        Some(ObjectKeyKind::Avatar { .. }) => Err(ClassroomError::bad_request(
            "Avatars are uploaded through the profile endpoint",
        )),
        None => Err(ClassroomError::bad_request("Invalid object key")),
    }
}

/// 上传流程第二步：写入已签发对象键的内容
pub async fn upload_object(
    storage: &Arc<dyn Storage>,
    object_store: &Arc<dyn ObjectStore>,
    actor: &User,
    key: &str,
    bytes: Vec<u8>,
    policy: &UploadPolicy,
) -> Result<ObjectUploadResponse> {
    validate_object_key(key)?;
    authorize_upload(storage, actor, key).await?;
    policy.check(key, &bytes)?;

    let size = bytes.len();
    object_store.put(key, bytes).await?;
    info!("User {} uploaded {} bytes to {}", actor.id, size, key);

    Ok(ObjectUploadResponse {
        object_key: key.to_string(),
        size,
        url: None,
    })
}

pub async fn handle_upload(
    service: &StorageService,
    request: &HttpRequest,
    key: String,
    payload: Multipart,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let object_store = get_object_store(request);
    let policy = UploadPolicy::from_config(&AppConfig::get().object_store);

    let actor = match current_user(request) {
        Ok(user) => user,
        Err(e) => return Ok(error_response(&e)),
    };

    // 先鉴权，避免为无权限的请求读取整个负载
    if let Err(e) = validate_object_key(&key) {
        return Ok(error_response(&e));
    }
    if let Err(e) = authorize_upload(&storage, &actor, &key).await {
        return Ok(error_response(&e));
    }

    let file = match read_single_file(payload, policy.max_size).await {
        Ok(file) => file,
        Err(e) => return Ok(error_response(&e)),
    };

    respond(
        upload_object(&storage, &object_store, &actor, &key, file.bytes, &policy).await,
        "File uploaded successfully",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::attachments::{entities::AttachmentKind, requests::CreateAttachment};
    use crate::models::classrooms::entities::ClassroomModifier;
    use crate::models::submissions::{entities::SubmissionStatus, requests::CreateSubmission};
    use crate::object_store::keys::{attachment_key, avatar_key, submission_key};
    use crate::test_support;

    const PDF: &[u8] = b"%PDF-1.7 test";

    fn policy() -> UploadPolicy {
        UploadPolicy {
            max_size: 1024,
            allowed_types: vec![".pdf".to_string(), ".png".to_string()],
        }
    }

    #[test]
    fn test_policy_check() {
        let policy = policy();
        assert_eq!(policy.check("notes.PDF", PDF).unwrap(), ".pdf");
        assert!(policy.check("notes.pdf", b"").is_err());
        assert!(policy.check("notes.exe", PDF).is_err());
        assert!(policy.check("notes.png", PDF).is_err());
        assert!(policy.check("notes.pdf", &vec![b'%'; 2048]).is_err());
    }

    #[tokio::test]
    async fn test_upload_attachment_by_owner_only() {
        let storage = test_support::storage().await;
        let store = test_support::object_store();
        let object_store = test_support::as_dyn(&store);
        let owner = test_support::teacher(&storage, "owner").await;
        let other = test_support::teacher(&storage, "other").await;
        let classroom =
            test_support::classroom(&storage, &owner, ClassroomModifier::Public, None).await;
        let assignment = test_support::assignment(&storage, classroom.id, None).await;

        let key = attachment_key(classroom.id, assignment.id, "notes.pdf");
        storage
            .create_attachment(CreateAttachment {
                assignment_id: assignment.id,
                filename: "notes.pdf".to_string(),
                object_key: key.clone(),
                kind: AttachmentKind::Attachment,
            })
            .await
            .unwrap();

        let err = upload_object(&storage, &object_store, &other, &key, PDF.to_vec(), &policy())
            .await
            .unwrap_err();
        assert_eq!(err.transport_code(), "UNAUTHORIZED");
        assert!(store.is_empty());

        let resp = upload_object(&storage, &object_store, &owner, &key, PDF.to_vec(), &policy())
            .await
            .unwrap();
        assert_eq!(resp.size, PDF.len());
        assert!(store.contains(&key));
    }

    #[tokio::test]
    async fn test_upload_submission_by_submitter_only() {
        let storage = test_support::storage().await;
        let store = test_support::object_store();
        let object_store = test_support::as_dyn(&store);
        let owner = test_support::teacher(&storage, "owner").await;
        let alice = test_support::student(&storage, "alice").await;
        let bob = test_support::student(&storage, "bob").await;
        let classroom =
            test_support::classroom(&storage, &owner, ClassroomModifier::Public, None).await;
        let assignment = test_support::assignment(&storage, classroom.id, None).await;

        let key = submission_key(classroom.id, assignment.id, alice.id, "essay.pdf");
        storage
            .create_submission(CreateSubmission {
                assignment_id: assignment.id,
                student_id: alice.id,
                filename: "essay.pdf".to_string(),
                object_key: key.clone(),
                status: SubmissionStatus::Pending,
                is_late: false,
            })
            .await
            .unwrap();

        for actor in [&bob, &owner] {
            let err = upload_object(&storage, &object_store, actor, &key, PDF.to_vec(), &policy())
                .await
                .unwrap_err();
            assert_eq!(err.transport_code(), "FORBIDDEN");
        }

        upload_object(&storage, &object_store, &alice, &key, PDF.to_vec(), &policy())
            .await
            .unwrap();
        assert!(store.contains(&key));
    }

    #[tokio::test]
    async fn test_upload_rejects_unknown_keys() {
        let storage = test_support::storage().await;
        let object_store = test_support::as_dyn(&test_support::object_store());
        let owner = test_support::teacher(&storage, "owner").await;

        // 未签发的键
        let key = attachment_key(1, 1, "notes.pdf");
        let err = upload_object(&storage, &object_store, &owner, &key, PDF.to_vec(), &policy())
            .await
            .unwrap_err();
        assert_eq!(err.transport_code(), "NOT_FOUND");

        let key = avatar_key(owner.id, "png");
        assert!(
            upload_object(&storage, &object_store, &owner, &key, PDF.to_vec(), &policy())
                .await
                .is_err()
        );

        let err = upload_object(
            &storage,
            &object_store,
            &owner,
            "random/key.pdf",
            PDF.to_vec(),
            &policy(),
        )
        .await
        .unwrap_err();
        assert_eq!(err.transport_code(), "BAD_REQUEST");
    }
}
