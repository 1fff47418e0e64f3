use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::services::CommentService;

static COMMENT_SERVICE: Lazy<CommentService> = Lazy::new(CommentService::new_lazy);

pub async fn delete_comment(
    req: HttpRequest,
    comment_id: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    COMMENT_SERVICE
        .delete_comment(&req, comment_id.into_inner())
        .await
}

// 配置路由
pub fn configure_comment_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/comments")
            .wrap(middlewares::RequireJWT)
            .route("/{comment_id}", web::delete().to(delete_comment)),
    );
}
