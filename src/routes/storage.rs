use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::services::StorageService;

// 懒加载的全局 StorageService 实例
static STORAGE_SERVICE: Lazy<StorageService> = Lazy::new(StorageService::new_lazy);

pub async fn upload_object(
    req: HttpRequest,
    key: web::Path<String>,
    payload: Multipart,
) -> ActixResult<HttpResponse> {
    STORAGE_SERVICE
        .upload(&req, key.into_inner(), payload)
        .await
}

pub async fn download_object(
    req: HttpRequest,
    key: web::Path<String>,
) -> ActixResult<HttpResponse> {
    STORAGE_SERVICE.download(&req, key.into_inner()).await
}

pub async fn download_public_object(
    req: HttpRequest,
    key: web::Path<String>,
) -> ActixResult<HttpResponse> {
    STORAGE_SERVICE
        .download_public(&req, key.into_inner())
        .await
}

// 配置路由
pub fn configure_storage_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/storage")
            // 头像公开访问，无需令牌
            .route("/public/{key:.*}", web::get().to(download_public_object))
            .service(
                web::scope("")
                    .wrap(middlewares::RequireJWT)
                    .service(
                        web::resource("/{key:.*}")
                            .route(web::put().to(upload_object))
                            .route(web::get().to(download_object)),
                    ),
            ),
    );
}
