use std::sync::Arc;

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::UserService;
use crate::config::AppConfig;
use crate::errors::{ClassroomError, Result};
use crate::models::users::{
    entities::User, requests::UpdateUser, responses::UserResponse,
};
use crate::object_store::ObjectStore;
use crate::object_store::keys::{AVATAR_PREFIX, ObjectKeyKind, avatar_key, parse_object_key};
use crate::services::storage::upload::read_single_file;
use crate::services::{
    current_user, delete_object_logged, error_response, evict_user_cache, get_object_store,
    respond,
};
use crate::storage::Storage;
use crate::utils::file_magic::{extension_of, is_image_extension};
use crate::utils::validate_magic_bytes;

/// 从头像地址中还原本人的头像对象键
fn own_avatar_key(image_url: &str, user_id: i64) -> Option<String> {
    let start = image_url.find(AVATAR_PREFIX)?;
    let key = &image_url[start..];
    match parse_object_key(key) {
        Some(ObjectKeyKind::Avatar { user_id: owner }) if owner == user_id => Some(key.to_string()),
        _ => None,
    }
}

/// 写入新头像并更新 `image`，随后删除旧头像对象
pub async fn set_avatar(
    storage: &Arc<dyn Storage>,
    object_store: &Arc<dyn ObjectStore>,
    actor: &User,
    filename: &str,
    bytes: Vec<u8>,
    max_size: usize,
) -> Result<User> {
    let extension = extension_of(filename)
        .filter(|ext| is_image_extension(ext))
        .ok_or_else(|| ClassroomError::bad_request("Avatar must be an image"))?;
    if bytes.len() > max_size {
        return Err(ClassroomError::bad_request("File size exceeds the limit"));
    }
    if !validate_magic_bytes(&bytes, &extension) {
        return Err(ClassroomError::bad_request(
            "File content does not match its extension",
        ));
    }

    let key = avatar_key(actor.id, extension.trim_start_matches('.'));
    object_store.put(&key, bytes).await?;

    let updated = storage
        .update_user(
            actor.id,
            UpdateUser {
                image: Some(object_store.public_url(&key)),
                ..Default::default()
            },
        )
        .await;

    let user = match updated {
        Ok(Some(user)) => user,
        Ok(None) => {
            delete_object_logged(object_store, &key).await;
            return Err(ClassroomError::not_found("User not found"));
        }
        Err(e) => {
            delete_object_logged(object_store, &key).await;
            return Err(e);
        }
    };

    if let Some(previous) = actor
        .image
        .as_deref()
        .and_then(|url| own_avatar_key(url, actor.id))
        && previous != key
    {
        delete_object_logged(object_store, &previous).await;
    }

    Ok(user)
}

pub async fn handle_upload_avatar(
    service: &UserService,
    request: &HttpRequest,
    payload: Multipart,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let object_store = get_object_store(request);
    let max_size = AppConfig::get().object_store.max_size;

    let session_user = match current_user(request) {
        Ok(user) => user,
        Err(e) => return Ok(error_response(&e)),
    };

    // 会话缓存中的 image 可能已过期，以数据库为准
    let actor = match storage.get_user_by_id(session_user.id).await {
        Ok(Some(user)) => user,
        Ok(None) => return Ok(error_response(&ClassroomError::not_found("User not found"))),
        Err(e) => return Ok(error_response(&e)),
    };

    let file = match read_single_file(payload, max_size).await {
        Ok(file) => file,
        Err(e) => return Ok(error_response(&e)),
    };
    let filename = file.filename.unwrap_or_default();

    let result = set_avatar(&storage, &object_store, &actor, &filename, file.bytes, max_size).await;
    if result.is_ok() {
        info!("User {} updated avatar", actor.id);
        evict_user_cache(request, actor.id).await;
    }
    respond(
        result.map(|user| UserResponse { user }),
        "Avatar uploaded successfully",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support;

    const PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0];

    #[tokio::test]
    async fn test_set_avatar_replaces_previous_object() {
        let storage = test_support::storage().await;
        let store = test_support::object_store();
        let object_store = test_support::as_dyn(&store);
        let alice = test_support::student(&storage, "alice").await;

        let first = set_avatar(&storage, &object_store, &alice, "me.png", PNG.to_vec(), 1024)
            .await
            .unwrap();
        let first_url = first.image.clone().unwrap();
        assert!(first_url.contains(&format!("avatars/{}/", alice.id)));
        assert_eq!(store.len(), 1);

        let second = set_avatar(&storage, &object_store, &first, "me.png", PNG.to_vec(), 1024)
            .await
            .unwrap();
        assert_ne!(second.image, first.image);
        assert_eq!(store.len(), 1);
        let first_key = own_avatar_key(&first_url, alice.id).unwrap();
        assert!(!store.contains(&first_key));
    }

    #[tokio::test]
    async fn test_set_avatar_rejects_non_images() {
        let storage = test_support::storage().await;
        let store = test_support::object_store();
        let object_store = test_support::as_dyn(&store);
        let alice = test_support::student(&storage, "alice").await;

        let err = set_avatar(&storage, &object_store, &alice, "me.pdf", b"%PDF".to_vec(), 1024)
            .await
            .unwrap_err();
        assert_eq!(err.transport_code(), "BAD_REQUEST");

        let err = set_avatar(&storage, &object_store, &alice, "me.png", b"GIF89a".to_vec(), 1024)
            .await
            .unwrap_err();
        assert_eq!(err.transport_code(), "BAD_REQUEST");
        assert!(store.is_empty());
    }

    #[test]
    fn test_own_avatar_key() {
        let url = "http://localhost/api/v1/storage/public/avatars/7/abc.png";
        assert_eq!(
            own_avatar_key(url, 7).as_deref(),
            Some("avatars/7/abc.png")
        );
        assert_eq!(own_avatar_key(url, 8), None);
        assert_eq!(own_avatar_key("https://cdn.example.com/me.png", 7), None);
    }
}
