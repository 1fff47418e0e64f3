use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::ClassroomService;
use crate::errors::{ClassroomError, Result};
use crate::models::users::entities::User;
use crate::object_store::ObjectStore;
use crate::object_store::keys::classroom_prefix;
use crate::services::guards::assert_is_classroom_admin;
use crate::services::{
    current_user, delete_prefix_logged, error_response, get_object_store, respond_empty,
};
use crate::storage::Storage;

/// 删除教室（级联删除子记录），再尽力清理 `classrooms/{id}/` 下的对象
pub async fn delete_classroom(
    storage: &Arc<dyn Storage>,
    object_store: &Arc<dyn ObjectStore>,
    actor: &User,
    classroom_id: i64,
) -> Result<()> {
    assert_is_classroom_admin(storage, actor, classroom_id).await?;

    if !storage.delete_classroom(classroom_id).await? {
        return Err(ClassroomError::not_found("Classroom not found"));
    }
    info!("Classroom {} deleted by {}", classroom_id, actor.id);

    delete_prefix_logged(object_store, &classroom_prefix(classroom_id)).await;
    Ok(())
}

pub async fn handle_delete_classroom(
    service: &ClassroomService,
    request: &HttpRequest,
    classroom_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let object_store = get_object_store(request);
    let actor = match current_user(request) {
        Ok(user) => user,
        Err(e) => return Ok(error_response(&e)),
    };
    respond_empty(
        delete_classroom(&storage, &object_store, &actor, classroom_id).await,
        "Classroom deleted successfully",
    )
}
