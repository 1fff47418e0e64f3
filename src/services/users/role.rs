use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::UserService;
use crate::errors::{ClassroomError, Result};
use crate::models::users::{
    entities::{User, UserRole},
    requests::SelectRoleRequest,
    responses::UserResponse,
};
use crate::services::{current_user, error_response, evict_user_cache, respond};
use crate::storage::Storage;

/// 角色只能选择一次，已设置时返回 BAD_REQUEST 且不修改
pub async fn select_role(storage: &Arc<dyn Storage>, actor: &User, role: UserRole) -> Result<User> {
    if !storage.set_user_role_if_unset(actor.id, role).await? {
        return Err(ClassroomError::bad_request("Role has already been selected"));
    }

    storage
        .get_user_by_id(actor.id)
        .await?
        .ok_or_else(|| ClassroomError::not_found("User not found"))
}

pub async fn handle_select_role(
    service: &UserService,
    request: &HttpRequest,
    body: SelectRoleRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let actor = match current_user(request) {
        Ok(user) => user,
        Err(e) => return Ok(error_response(&e)),
    };

    let result = select_role(&storage, &actor, body.role).await;
    if result.is_ok() {
        info!("User {} selected role {}", actor.id, body.role);
        evict_user_cache(request, actor.id).await;
    }
    respond(
        result.map(|user| UserResponse { user }),
        "Role selected successfully",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support;

    #[tokio::test]
    async fn test_select_role_once() {
        let storage = test_support::storage().await;
        let user = test_support::create_user(&storage, "alice", None).await;

        let updated = select_role(&storage, &user, UserRole::Teacher).await.unwrap();
        assert_eq!(updated.role, Some(UserRole::Teacher));
    }

    #[tokio::test]
    async fn test_select_role_twice_keeps_original() {
        let storage = test_support::storage().await;
        let user = test_support::create_user(&storage, "alice", None).await;
        select_role(&storage, &user, UserRole::Student).await.unwrap();

        let err = select_role(&storage, &user, UserRole::Teacher)
            .await
            .unwrap_err();
        assert_eq!(err.transport_code(), "BAD_REQUEST");

        let stored = storage.get_user_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(stored.role, Some(UserRole::Student));
    }
}
