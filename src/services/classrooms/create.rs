use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::StatusCode};
use tracing::info;

use super::ClassroomService;
use crate::errors::{ClassroomError, Result};
use crate::models::classrooms::{
    entities::{Classroom, ClassroomModifier, ClassroomStatus},
    requests::{CreateClassroom, CreateClassroomRequest},
};
use crate::models::users::entities::User;
use crate::services::guards::assert_is_teacher;
use crate::services::{current_user, error_response, respond_with};
use crate::storage::Storage;
use crate::utils::password::hash_password;
use crate::utils::validate::{validate_language, validate_name, validate_text};

pub const DEFAULT_LANGUAGE: &str = "en";
const MAX_PASSWORD_BYTES: usize = 128;

/// 私有教室必须设置密码，公开教室不保存密码
pub(crate) fn classroom_password_hash(
    modifier: ClassroomModifier,
    password: Option<&str>,
) -> Result<Option<String>> {
    match modifier {
        ClassroomModifier::Public => Ok(None),
        ClassroomModifier::Private => {
            let password = password
                .filter(|p| !p.is_empty())
                .ok_or_else(|| ClassroomError::bad_request("A private classroom requires a password"))?;
            if password.len() > MAX_PASSWORD_BYTES {
                return Err(ClassroomError::validation(format!(
                    "Classroom password must be at most {MAX_PASSWORD_BYTES} bytes"
                )));
            }
            hash_password(password).map(Some)
        }
    }
}

pub async fn create_classroom(
    storage: &Arc<dyn Storage>,
    actor: &User,
    request: CreateClassroomRequest,
) -> Result<Classroom> {
    assert_is_teacher(actor)?;

    let name = validate_name("Classroom name", &request.name)?;
    let description = request
        .description
        .as_deref()
        .map(|d| validate_text("Description", d))
        .transpose()?;
    let language = validate_language(request.language.as_deref().unwrap_or(DEFAULT_LANGUAGE))?;
    let password_hash = classroom_password_hash(request.modifier, request.password.as_deref())?;

    storage
        .create_classroom(CreateClassroom {
            owner_id: actor.id,
            name,
            description,
            modifier: request.modifier,
            password_hash,
            status: request.status.unwrap_or(ClassroomStatus::Active),
            language,
        })
        .await
}

pub async fn handle_create_classroom(
    service: &ClassroomService,
    request: &HttpRequest,
    body: CreateClassroomRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let actor = match current_user(request) {
        Ok(user) => user,
        Err(e) => return Ok(error_response(&e)),
    };

    let result = create_classroom(&storage, &actor, body).await;
    if let Ok(classroom) = &result {
        info!("Classroom {} created by {}", classroom.id, actor.id);
    }
    respond_with(StatusCode::CREATED, result, "Classroom created successfully")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support;
    use crate::utils::password::verify_password;

    fn request(modifier: ClassroomModifier, password: Option<&str>) -> CreateClassroomRequest {
        CreateClassroomRequest {
            name: "Biology".to_string(),
            description: Some("Cells".to_string()),
            modifier,
            password: password.map(str::to_string),
            status: None,
            language: None,
        }
    }

    #[tokio::test]
    async fn test_create_public_classroom() {
        let storage = test_support::storage().await;
        let teacher = test_support::teacher(&storage, "teacher").await;

        let classroom = create_classroom(
            &storage,
            &teacher,
            request(ClassroomModifier::Public, Some("ignored")),
        )
        .await
        .unwrap();
        assert_eq!(classroom.owner_id, teacher.id);
        assert_eq!(classroom.status, ClassroomStatus::Active);
        assert_eq!(classroom.language, DEFAULT_LANGUAGE);
        assert!(classroom.password_hash.is_none());
    }

    #[tokio::test]
    async fn test_create_private_classroom_requires_password() {
        let storage = test_support::storage().await;
        let teacher = test_support::teacher(&storage, "teacher").await;

        let err = create_classroom(&storage, &teacher, request(ClassroomModifier::Private, None))
            .await
            .unwrap_err();
        assert_eq!(err.transport_code(), "BAD_REQUEST");

        let classroom = create_classroom(
            &storage,
            &teacher,
            request(ClassroomModifier::Private, Some("secret")),
        )
        .await
        .unwrap();
        let hash = classroom.password_hash.unwrap();
        assert!(verify_password("secret", &hash));
    }

    #[tokio::test]
    async fn test_student_cannot_create_classroom() {
        let storage = test_support::storage().await;
        let student = test_support::student(&storage, "student").await;

        let err = create_classroom(&storage, &student, request(ClassroomModifier::Public, None))
            .await
            .unwrap_err();
        assert_eq!(err.transport_code(), "UNAUTHORIZED");
    }
}
