use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::services::AttachmentService;

static ATTACHMENT_SERVICE: Lazy<AttachmentService> = Lazy::new(AttachmentService::new_lazy);

pub async fn delete_attachment(
    req: HttpRequest,
    attachment_id: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    ATTACHMENT_SERVICE
        .delete_attachment(&req, attachment_id.into_inner())
        .await
}

// 配置路由
pub fn configure_attachment_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/attachments")
            .wrap(middlewares::RequireJWT)
            .route("/{attachment_id}", web::delete().to(delete_attachment)),
    );
}
