use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::StatusCode};
use tracing::info;

use super::AuthService;
use crate::errors::{ClassroomError, Result};
use crate::models::auth::requests::{CreateUser, RegisterRequest};
use crate::models::users::entities::User;
use crate::services::respond_with;
use crate::storage::Storage;
use crate::utils::password::hash_password;
use crate::utils::validate::{validate_email, validate_name, validate_password, validate_username};

/// 注册新用户，角色留空待用户自行选择
pub async fn register_user(storage: &Arc<dyn Storage>, request: RegisterRequest) -> Result<User> {
    let username = request.username.trim().to_string();
    let email = request.email.trim().to_lowercase();

    validate_username(&username)?;
    validate_email(&email)?;
    validate_password(&request.password)?;
    let display_name = request
        .display_name
        .as_deref()
        .map(|name| validate_name("Display name", name))
        .transpose()?;

    if storage.get_user_by_username(&username).await?.is_some() {
        return Err(ClassroomError::conflict(format!(
            "Username '{username}' already exists"
        )));
    }
    if storage.get_user_by_email(&email).await?.is_some() {
        return Err(ClassroomError::conflict(format!(
            "Email '{email}' already exists"
        )));
    }

    let password_hash = hash_password(&request.password)?;
    storage
        .create_user(CreateUser {
            username,
            email,
            password_hash,
            display_name,
        })
        .await
}

pub async fn handle_register(
    service: &AuthService,
    register_request: RegisterRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let result = register_user(&storage, register_request).await;
    if let Ok(user) = &result {
        info!("User {} registered successfully", user.username);
    }
    respond_with(StatusCode::CREATED, result, "User registered successfully")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support;

    fn request(username: &str, email: &str) -> RegisterRequest {
        RegisterRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: test_support::PASSWORD.to_string(),
            display_name: Some("  Alice  ".to_string()),
        }
    }

    #[tokio::test]
    async fn test_register_creates_user_without_role() {
        let storage = test_support::storage().await;
        let user = register_user(&storage, request("alice", "Alice@Example.com"))
            .await
            .unwrap();

        assert_eq!(user.username, "alice");
        assert_eq!(user.email, "alice@example.com");
        assert_eq!(user.display_name.as_deref(), Some("Alice"));
        assert!(user.role.is_none());
        assert_ne!(user.password_hash, test_support::PASSWORD);
    }

    #[tokio::test]
    async fn test_register_duplicates_conflict() {
        let storage = test_support::storage().await;
        register_user(&storage, request("alice", "alice@example.com"))
            .await
            .unwrap();

        let err = register_user(&storage, request("alice", "other@example.com"))
            .await
            .unwrap_err();
        assert_eq!(err.transport_code(), "CONFLICT");

        let err = register_user(&storage, request("bob", "alice@example.com"))
            .await
            .unwrap_err();
        assert_eq!(err.transport_code(), "CONFLICT");
    }

    #[tokio::test]
    async fn test_register_rejects_weak_password() {
        let storage = test_support::storage().await;
        let mut req = request("alice", "alice@example.com");
        req.password = "short".to_string();

        let err = register_user(&storage, req).await.unwrap_err();
        assert_eq!(err.transport_code(), "BAD_REQUEST");
        assert!(storage.get_user_by_username("alice").await.unwrap().is_none());
    }
}
