use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ClassroomService;
use super::create::classroom_password_hash;
use crate::errors::{ClassroomError, Result};
use crate::models::classrooms::{
    entities::{Classroom, ClassroomModifier},
    requests::{UpdateClassroom, UpdateClassroomRequest},
};
use crate::models::users::entities::User;
use crate::services::guards::assert_is_classroom_admin;
use crate::services::{current_user, error_response, respond};
use crate::storage::Storage;
use crate::utils::validate::{validate_language, validate_name, validate_text};

/// 部分更新；切换为私有需要密码，切换为公开会清除密码
pub async fn update_classroom(
    storage: &Arc<dyn Storage>,
    actor: &User,
    classroom_id: i64,
    request: UpdateClassroomRequest,
) -> Result<Classroom> {
    let classroom = assert_is_classroom_admin(storage, actor, classroom_id).await?;

    let name = request
        .name
        .as_deref()
        .map(|n| validate_name("Classroom name", n))
        .transpose()?;
    let description = request
        .description
        .as_deref()
        .map(|d| validate_text("Description", d))
        .transpose()?;
    let language = request
        .language
        .as_deref()
        .map(validate_language)
        .transpose()?;

    let modifier = request.modifier.unwrap_or(classroom.modifier);
    let password_hash = match modifier {
        ClassroomModifier::Public => classroom.password_hash.is_some().then_some(None),
        ClassroomModifier::Private => match request.password.as_deref() {
            Some(password) => Some(classroom_password_hash(modifier, Some(password))?),
            // 保留已有密码
            None if classroom.password_hash.is_some() => None,
            None => {
                return Err(ClassroomError::bad_request(
                    "A private classroom requires a password",
                ));
            }
        },
    };

    storage
        .update_classroom(
            classroom_id,
            UpdateClassroom {
                name,
                description,
                modifier: request.modifier,
                password_hash,
                status: request.status,
                language,
            },
        )
        .await?
        .ok_or_else(|| ClassroomError::not_found("Classroom not found"))
}

pub async fn handle_update_classroom(
    service: &ClassroomService,
    request: &HttpRequest,
    classroom_id: i64,
    body: UpdateClassroomRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let actor = match current_user(request) {
        Ok(user) => user,
        Err(e) => return Ok(error_response(&e)),
    };
    respond(
        update_classroom(&storage, &actor, classroom_id, body).await,
        "Classroom updated successfully",
    )
}
