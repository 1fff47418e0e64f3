pub mod assignments;
pub mod attachments;
pub mod auth;
pub mod classrooms;
pub mod comments;
pub mod guards;
pub mod storage;
pub mod subjects;
pub mod submissions;
pub mod users;

pub use assignments::AssignmentService;
pub use attachments::AttachmentService;
pub use auth::AuthService;
pub use classrooms::ClassroomService;
pub use comments::CommentService;
pub use storage::StorageService;
pub use subjects::SubjectService;
pub use submissions::SubmissionService;
pub use users::UserService;

use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::StatusCode};
use serde::Serialize;
use tracing::{debug, error, warn};

use crate::cache::{ObjectCache, user_cache_key};
use crate::errors::{ClassroomError, Result};
use crate::middlewares::RequireJWT;
use crate::models::ApiResponse;
use crate::models::users::entities::User;
use crate::object_store::ObjectStore;

/// 将业务错误转换为统一响应，基础设施错误记录日志且不暴露细节
pub(crate) fn error_response(err: &ClassroomError) -> HttpResponse {
    if err.is_internal() {
        error!("{}", err);
    } else {
        debug!("Request rejected: {}", err);
    }
    HttpResponse::build(err.status_code()).json(ApiResponse::<()>::from_error(err))
}

/// 以指定状态码返回成功结果，失败时返回错误响应
pub(crate) fn respond_with<T: Serialize>(
    status: StatusCode,
    result: Result<T>,
    message: &str,
) -> ActixResult<HttpResponse> {
    match result {
        Ok(data) => Ok(HttpResponse::build(status).json(ApiResponse::success(data, message))),
        Err(e) => Ok(error_response(&e)),
    }
}

pub(crate) fn respond<T: Serialize>(result: Result<T>, message: &str) -> ActixResult<HttpResponse> {
    respond_with(StatusCode::OK, result, message)
}

/// 无数据的成功响应
pub(crate) fn respond_empty(result: Result<()>, message: &str) -> ActixResult<HttpResponse> {
    match result {
        Ok(()) => Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_empty(message))),
        Err(e) => Ok(error_response(&e)),
    }
}

/// 当前会话用户，由 RequireJWT 写入请求扩展
pub(crate) fn current_user(request: &HttpRequest) -> Result<User> {
    RequireJWT::extract_user_claims(request)
        .ok_or_else(|| ClassroomError::authentication("Unauthorized access, please login"))
}

pub(crate) fn get_object_store(request: &HttpRequest) -> Arc<dyn ObjectStore> {
    request
        .app_data::<actix_web::web::Data<Arc<dyn ObjectStore>>>()
        .expect("Object store not found in app data")
        .get_ref()
        .clone()
}

/// 用户资料变更后清除会话缓存
pub(crate) async fn evict_user_cache(request: &HttpRequest, user_id: i64) {
    match request.app_data::<actix_web::web::Data<Arc<dyn ObjectCache>>>() {
        Some(cache) => cache.remove(&user_cache_key(user_id)).await,
        None => warn!("Cache not found in app data, skip evicting user {}", user_id),
    }
}

/// 删除对象失败只记录日志，不影响已完成的数据库操作
pub(crate) async fn delete_object_logged(object_store: &Arc<dyn ObjectStore>, key: &str) {
    if let Err(e) = object_store.delete(key).await {
        warn!("Failed to delete object {}: {}", key, e);
    }
}

pub(crate) async fn delete_prefix_logged(object_store: &Arc<dyn ObjectStore>, prefix: &str) {
    match object_store.delete_prefix(prefix).await {
        Ok(count) => debug!("Deleted {} objects under {}", count, prefix),
        Err(e) => warn!("Failed to delete objects under {}: {}", prefix, e),
    }
}

/// 生成 `XxxService { storage }` 结构体及其存储访问方法
macro_rules! define_service {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        pub struct $name {
            storage: Option<std::sync::Arc<dyn crate::storage::Storage>>,
        }

        impl $name {
            pub fn new_lazy() -> Self {
                Self { storage: None }
            }

            pub(crate) fn get_storage(
                &self,
                request: &actix_web::HttpRequest,
            ) -> std::sync::Arc<dyn crate::storage::Storage> {
                if let Some(storage) = &self.storage {
                    storage.clone()
                } else {
                    request
                        .app_data::<actix_web::web::Data<std::sync::Arc<dyn crate::storage::Storage>>>()
                        .expect("Storage not found in app data")
                        .get_ref()
                        .clone()
                }
            }
        }
    };
}

pub(crate) use define_service;
