use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ClassroomService;
use crate::errors::{ClassroomError, Result};
use crate::models::ratings::{
    entities::{MAX_RATING, MIN_RATING, Rating},
    requests::SetRatingRequest,
};
use crate::models::users::entities::User;
use crate::services::guards::{assert_is_classroom_admin, assert_is_enrolled};
use crate::services::{current_user, error_response, respond};
use crate::storage::Storage;

pub async fn list_ratings(
    storage: &Arc<dyn Storage>,
    actor: &User,
    classroom_id: i64,
) -> Result<Vec<Rating>> {
    assert_is_classroom_admin(storage, actor, classroom_id).await?;
    storage.list_ratings(classroom_id).await
}

/// 设置评级，同一学生重复设置覆盖原值
pub async fn set_rating(
    storage: &Arc<dyn Storage>,
    actor: &User,
    classroom_id: i64,
    student_id: i64,
    amount: i32,
) -> Result<Rating> {
    assert_is_classroom_admin(storage, actor, classroom_id).await?;

    if !(MIN_RATING..=MAX_RATING).contains(&amount) {
        return Err(ClassroomError::validation(format!(
            "Rating must be between {MIN_RATING} and {MAX_RATING}"
        )));
    }
    if !storage.is_enrolled(classroom_id, student_id).await? {
        return Err(ClassroomError::bad_request(
            "Student is not enrolled in this classroom",
        ));
    }

    storage.upsert_rating(classroom_id, student_id, amount).await
}

pub async fn get_my_rating(
    storage: &Arc<dyn Storage>,
    actor: &User,
    classroom_id: i64,
) -> Result<Rating> {
    assert_is_enrolled(storage, actor, classroom_id).await?;
    storage
        .get_rating(classroom_id, actor.id)
        .await?
        .ok_or_else(|| ClassroomError::not_found("No rating yet"))
}

pub async fn handle_list_ratings(
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
        list_ratings(&storage, &actor, classroom_id).await,
        "Ratings retrieved successfully",
    )
}

pub async fn handle_set_rating(
    service: &ClassroomService,
    request: &HttpRequest,
    classroom_id: i64,
    student_id: i64,
    body: SetRatingRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let actor = match current_user(request) {
        Ok(user) => user,
        Err(e) => return Ok(error_response(&e)),
    };
    respond(
        set_rating(&storage, &actor, classroom_id, student_id, body.amount).await,
        "Rating saved successfully",
    )
}

pub async fn handle_get_my_rating(
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
        get_my_rating(&storage, &actor, classroom_id).await,
        "Rating retrieved successfully",
    )
}
