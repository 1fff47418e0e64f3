use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ClassroomService;
use crate::errors::Result;
use crate::models::classrooms::responses::ClassroomDetailResponse;
use crate::models::users::entities::User;
use crate::services::guards::assert_is_classroom_member;
use crate::services::{current_user, error_response, respond};
use crate::storage::Storage;

pub async fn get_classroom(
    storage: &Arc<dyn Storage>,
    actor: &User,
    classroom_id: i64,
) -> Result<ClassroomDetailResponse> {
    let (classroom, is_owner) = assert_is_classroom_member(storage, actor, classroom_id).await?;
    Ok(ClassroomDetailResponse {
        classroom,
        is_owner,
    })
}

pub async fn handle_get_classroom(
    service: &ClassroomService,
    request: &HttpRequest,
    classroom_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let actor = match current_user(request) {
        Ok(user) => user,
        Err(e) => return Ok(error_response(&e)),
    };
    respond(
        get_classroom(&storage, &actor, classroom_id).await,
        "Classroom retrieved successfully",
    )
}
