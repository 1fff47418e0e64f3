use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::StatusCode};

use super::guards::assert_is_teacher;
use super::{current_user, define_service, error_response, respond, respond_with};
use crate::errors::{ClassroomError, Result};
use crate::models::subjects::{entities::Subject, requests::CreateSubjectRequest};
use crate::models::users::entities::User;
use crate::storage::Storage;
use crate::utils::validate::validate_name;

define_service!(SubjectService);

pub async fn create_subject(
    storage: &Arc<dyn Storage>,
    actor: &User,
    request: CreateSubjectRequest,
) -> Result<Subject> {
    assert_is_teacher(actor)?;
    let name = validate_name("Subject name", &request.name)?;

    storage.create_subject(&name).await.map_err(|e| match e {
        ClassroomError::Conflict(_) => {
            ClassroomError::conflict(format!("Subject '{name}' already exists"))
        }
        other => other,
    })
}

impl SubjectService {
    pub async fn list_subjects(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request);
        respond(
            storage.list_subjects().await,
            "Subjects retrieved successfully",
        )
    }

    pub async fn create_subject(
        &self,
        request: &HttpRequest,
        body: CreateSubjectRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request);
        let actor = match current_user(request) {
            Ok(user) => user,
            Err(e) => return Ok(error_response(&e)),
        };
        respond_with(
            StatusCode::CREATED,
            create_subject(&storage, &actor, body).await,
            "Subject created successfully",
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support;

    fn request(name: &str) -> CreateSubjectRequest {
        CreateSubjectRequest {
            name: name.to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_subject() {
        let storage = test_support::storage().await;
        let teacher = test_support::teacher(&storage, "teacher").await;
        let student = test_support::student(&storage, "student").await;

        let subject = create_subject(&storage, &teacher, request(" Math "))
            .await
            .unwrap();
        assert_eq!(subject.name, "Math");

        let err = create_subject(&storage, &teacher, request("Math"))
            .await
            .unwrap_err();
        assert_eq!(err.transport_code(), "CONFLICT");

        let err = create_subject(&storage, &student, request("Physics"))
            .await
            .unwrap_err();
        assert_eq!(err.transport_code(), "UNAUTHORIZED");

        assert_eq!(storage.list_subjects().await.unwrap().len(), 1);
    }
}
