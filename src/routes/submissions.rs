use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::comments::{entities::CommentTarget, requests::CreateCommentRequest};
use crate::models::submissions::requests::GradeSubmissionRequest;
use crate::services::{CommentService, SubmissionService};

static SUBMISSION_SERVICE: Lazy<SubmissionService> = Lazy::new(SubmissionService::new_lazy);
static COMMENT_SERVICE: Lazy<CommentService> = Lazy::new(CommentService::new_lazy);

pub async fn get_submission(
    req: HttpRequest,
    submission_id: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE
        .get_submission(&req, submission_id.into_inner())
        .await
}

pub async fn delete_submission(
    req: HttpRequest,
    submission_id: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE
        .delete_submission(&req, submission_id.into_inner())
        .await
}

pub async fn view_submission(
    req: HttpRequest,
    submission_id: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE
        .view_submission(&req, submission_id.into_inner())
        .await
}

pub async fn grade_submission(
    req: HttpRequest,
    submission_id: web::Path<i64>,
    body: web::Json<GradeSubmissionRequest>,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE
        .grade_submission(&req, submission_id.into_inner(), body.into_inner())
        .await
}

pub async fn list_comments(
    req: HttpRequest,
    submission_id: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    COMMENT_SERVICE
        .list_comments(&req, CommentTarget::Submission(submission_id.into_inner()))
        .await
}

pub async fn create_comment(
    req: HttpRequest,
    submission_id: web::Path<i64>,
    body: web::Json<CreateCommentRequest>,
) -> ActixResult<HttpResponse> {
    COMMENT_SERVICE
        .create_comment(
            &req,
            CommentTarget::Submission(submission_id.into_inner()),
            body.into_inner(),
        )
        .await
}

// 配置路由
pub fn configure_submission_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/submissions")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("/{submission_id}")
                    .route(web::get().to(get_submission))
                    .route(web::delete().to(delete_submission)),
            )
            .route("/{submission_id}/view", web::post().to(view_submission))
            .route("/{submission_id}/grade", web::put().to(grade_submission))
            .service(
                web::resource("/{submission_id}/comments")
                    .route(web::get().to(list_comments))
                    .route(web::post().to(create_comment)),
            ),
    );
}
