use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::UserService;
use crate::errors::{ClassroomError, Result};
use crate::models::users::{
    entities::{PublicUser, User},
    requests::{UpdateProfileRequest, UpdateUser},
    responses::{PublicUserResponse, UserResponse},
};
use crate::services::{current_user, error_response, evict_user_cache, respond};
use crate::storage::Storage;
use crate::utils::validate::{validate_email, validate_name, validate_text};

/// 更新本人资料（显示名、邮箱、简介）
pub async fn update_profile(
    storage: &Arc<dyn Storage>,
    actor: &User,
    request: UpdateProfileRequest,
) -> Result<User> {
    let display_name = request
        .display_name
        .as_deref()
        .map(|name| validate_name("Display name", name))
        .transpose()?;
    let bio = request
        .bio
        .as_deref()
        .map(|bio| validate_text("Bio", bio))
        .transpose()?;

    let email = match request.email {
        Some(email) => {
            let email = email.trim().to_lowercase();
            validate_email(&email)?;
            if let Some(existing) = storage.get_user_by_email(&email).await?
                && existing.id != actor.id
            {
                return Err(ClassroomError::conflict(format!(
                    "Email '{email}' already exists"
                )));
            }
            Some(email)
        }
        None => None,
    };

    storage
        .update_user(
            actor.id,
            UpdateUser {
                display_name,
                email,
                bio,
                image: None,
            },
        )
        .await?
        .ok_or_else(|| ClassroomError::not_found("User not found"))
}

pub async fn get_public_user(storage: &Arc<dyn Storage>, user_id: i64) -> Result<PublicUser> {
    storage
        .get_user_by_id(user_id)
        .await?
        .map(|user| user.to_public())
        .ok_or_else(|| ClassroomError::not_found("User not found"))
}

pub async fn handle_get_me(
    service: &UserService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let actor = match current_user(request) {
        Ok(user) => user,
        Err(e) => return Ok(error_response(&e)),
    };

    // 会话缓存可能落后于数据库
    let result = storage
        .get_user_by_id(actor.id)
        .await
        .and_then(|user| user.ok_or_else(|| ClassroomError::not_found("User not found")))
        .map(|user| UserResponse { user });
    respond(result, "User information retrieved successfully")
}

pub async fn handle_update_me(
    service: &UserService,
    request: &HttpRequest,
    update: UpdateProfileRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let actor = match current_user(request) {
        Ok(user) => user,
        Err(e) => return Ok(error_response(&e)),
    };

    let result = update_profile(&storage, &actor, update).await;
    if result.is_ok() {
        evict_user_cache(request, actor.id).await;
    }
    respond(
        result.map(|user| UserResponse { user }),
        "Profile updated successfully",
    )
}

pub async fn handle_get_user(
    service: &UserService,
    request: &HttpRequest,
    user_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    respond(
        get_public_user(&storage, user_id)
            .await
            .map(|user| PublicUserResponse { user }),
        "User retrieved successfully",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support;

    #[tokio::test]
    async fn test_update_profile() {
        let storage = test_support::storage().await;
        let alice = test_support::student(&storage, "alice").await;

        let updated = update_profile(
            &storage,
            &alice,
            UpdateProfileRequest {
                display_name: Some(" Alice A. ".to_string()),
                email: Some("ALICE.NEW@example.com".to_string()),
                bio: Some("Hello".to_string()),
            },
        )
        .await
        .unwrap();

        assert_eq!(updated.display_name.as_deref(), Some("Alice A."));
        assert_eq!(updated.email, "alice.new@example.com");
        assert_eq!(updated.bio.as_deref(), Some("Hello"));
        assert_eq!(updated.role, alice.role);
    }

    #[tokio::test]
    async fn test_update_profile_email_taken() {
        let storage = test_support::storage().await;
        let alice = test_support::student(&storage, "alice").await;
        test_support::student(&storage, "bob").await;

        let err = update_profile(
            &storage,
            &alice,
            UpdateProfileRequest {
                email: Some("bob@example.com".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.transport_code(), "CONFLICT");

        // 保持原邮箱不算冲突
        let same = update_profile(
            &storage,
            &alice,
            UpdateProfileRequest {
                email: Some("alice@example.com".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(same.email, "alice@example.com");
    }

    #[tokio::test]
    async fn test_public_user_hides_email() {
        let storage = test_support::storage().await;
        let alice = test_support::student(&storage, "alice").await;

        let public = get_public_user(&storage, alice.id).await.unwrap();
        let json = serde_json::to_value(&public).unwrap();
        assert!(json.get("email").is_none());
        assert_eq!(json["username"], "alice");

        let err = get_public_user(&storage, 9999).await.unwrap_err();
        assert_eq!(err.transport_code(), "NOT_FOUND");
    }
}
