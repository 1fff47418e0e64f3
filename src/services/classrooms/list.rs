use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ClassroomService;
use crate::errors::{ClassroomError, Result};
use crate::models::PaginationQuery;
use crate::models::classrooms::{
    requests::{BrowseClassroomsParams, ClassroomListQuery},
    responses::ClassroomListResponse,
};
use crate::models::users::entities::{User, UserRole};
use crate::services::{current_user, error_response, respond};
use crate::storage::Storage;
use crate::utils::validate::validate_language;

pub async fn list_my_classrooms(
    storage: &Arc<dyn Storage>,
    actor: &User,
    pagination: &PaginationQuery,
) -> Result<ClassroomListResponse> {
    let (page, size) = pagination.normalized();
    let query = ClassroomListQuery {
        page,
        size,
        ..Default::default()
    };

    match actor.role {
        Some(UserRole::Teacher) => storage.list_owned_classrooms(actor.id, query).await,
        Some(UserRole::Student) => storage.list_enrolled_classrooms(actor.id, query).await,
        None => Err(ClassroomError::authorization("Please select a role first")),
    }
}

/// 仅列出 active 教室，支持名称搜索与语言过滤
pub async fn browse_classrooms(
    storage: &Arc<dyn Storage>,
    params: BrowseClassroomsParams,
) -> Result<ClassroomListResponse> {
    let (page, size) = params.pagination.normalized();
    let search = params
        .search
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());
    let language = params
        .language
        .as_deref()
        .filter(|l| !l.trim().is_empty())
        .map(validate_language)
        .transpose()?;

    storage
        .browse_classrooms(ClassroomListQuery {
            page,
            size,
            search,
            language,
        })
        .await
}

pub async fn handle_list_classrooms(
    service: &ClassroomService,
    request: &HttpRequest,
    query: PaginationQuery,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let actor = match current_user(request) {
        Ok(user) => user,
        Err(e) => return Ok(error_response(&e)),
    };
    respond(
        list_my_classrooms(&storage, &actor, &query).await,
        "Classrooms retrieved successfully",
    )
}

pub async fn handle_browse_classrooms(
    service: &ClassroomService,
    request: &HttpRequest,
    params: BrowseClassroomsParams,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    respond(
        browse_classrooms(&storage, params).await,
        "Classrooms retrieved successfully",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::classrooms::entities::ClassroomModifier;
    use crate::test_support;

    #[tokio::test]
    async fn test_list_by_role() {
        let storage = test_support::storage().await;
        let teacher = test_support::teacher(&storage, "teacher").await;
        let student = test_support::student(&storage, "student").await;
        let nobody = test_support::create_user(&storage, "nobody", None).await;
        let first =
            test_support::classroom(&storage, &teacher, ClassroomModifier::Public, None).await;
        test_support::classroom(&storage, &teacher, ClassroomModifier::Public, None).await;
        test_support::enroll(&storage, first.id, student.id).await;

        let query = PaginationQuery::default();
        let owned = list_my_classrooms(&storage, &teacher, &query).await.unwrap();
        assert_eq!(owned.pagination.total, 2);

        let enrolled = list_my_classrooms(&storage, &student, &query).await.unwrap();
        assert_eq!(enrolled.items.len(), 1);
        assert_eq!(enrolled.items[0].id, first.id);

        assert!(list_my_classrooms(&storage, &nobody, &query).await.is_err());
    }

    #[tokio::test]
    async fn test_browse_hides_passwords() {
        let storage = test_support::storage().await;
        let teacher = test_support::teacher(&storage, "teacher").await;
        test_support::classroom(&storage, &teacher, ClassroomModifier::Private, Some("secret"))
            .await;

        let result = browse_classrooms(
            &storage,
            BrowseClassroomsParams {
                pagination: PaginationQuery::default(),
                search: Some("  Alg ".to_string()),
                language: Some("en".to_string()),
            },
        )
        .await
        .unwrap();
        assert_eq!(result.items.len(), 1);

        let json = serde_json::to_string(&result).unwrap();
        assert!(!json.contains("password"));
    }
}
