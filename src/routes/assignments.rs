use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::assignments::requests::UpdateAssignmentRequest;
use crate::models::attachments::requests::CreateAttachmentRequest;
use crate::models::comments::{entities::CommentTarget, requests::CreateCommentRequest};
use crate::models::submissions::requests::CreateSubmissionRequest;
use crate::models::users::entities::UserRole;
use crate::services::{AssignmentService, CommentService};

static ASSIGNMENT_SERVICE: Lazy<AssignmentService> = Lazy::new(AssignmentService::new_lazy);
static COMMENT_SERVICE: Lazy<CommentService> = Lazy::new(CommentService::new_lazy);

pub async fn get_assignment(
    req: HttpRequest,
    assignment_id: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE
        .get_assignment(&req, assignment_id.into_inner())
        .await
}

pub async fn update_assignment(
    req: HttpRequest,
    assignment_id: web::Path<i64>,
    body: web::Json<UpdateAssignmentRequest>,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE
        .update_assignment(&req, assignment_id.into_inner(), body.into_inner())
        .await
}

pub async fn delete_assignment(
    req: HttpRequest,
    assignment_id: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE
        .delete_assignment(&req, assignment_id.into_inner())
        .await
}

pub async fn list_attachments(
    req: HttpRequest,
    assignment_id: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE
        .list_attachments(&req, assignment_id.into_inner())
        .await
}

pub async fn create_attachment(
    req: HttpRequest,
    assignment_id: web::Path<i64>,
    body: web::Json<CreateAttachmentRequest>,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE
        .create_attachment(&req, assignment_id.into_inner(), body.into_inner())
        .await
}

pub async fn list_submissions(
    req: HttpRequest,
    assignment_id: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE
        .list_submissions(&req, assignment_id.into_inner())
        .await
}

pub async fn list_my_submissions(
    req: HttpRequest,
    assignment_id: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE
        .list_my_submissions(&req, assignment_id.into_inner())
        .await
}

pub async fn create_submission(
    req: HttpRequest,
    assignment_id: web::Path<i64>,
    body: web::Json<CreateSubmissionRequest>,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE
        .create_submission(&req, assignment_id.into_inner(), body.into_inner())
        .await
}

pub async fn list_comments(
    req: HttpRequest,
    assignment_id: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    COMMENT_SERVICE
        .list_comments(&req, CommentTarget::Assignment(assignment_id.into_inner()))
        .await
}

pub async fn create_comment(
    req: HttpRequest,
    assignment_id: web::Path<i64>,
    body: web::Json<CreateCommentRequest>,
) -> ActixResult<HttpResponse> {
    COMMENT_SERVICE
        .create_comment(
            &req,
            CommentTarget::Assignment(assignment_id.into_inner()),
            body.into_inner(),
        )
        .await
}

// 配置路由
pub fn configure_assignment_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/assignments")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("/{assignment_id}")
                    .route(web::get().to(get_assignment))
                    .route(web::put().to(update_assignment))
                    .route(web::delete().to(delete_assignment)),
            )
            .service(
                web::resource("/{assignment_id}/attachments")
                    .route(web::get().to(list_attachments))
                    .route(web::post().to(create_attachment)),
            )
            .service(
                web::resource("/{assignment_id}/submissions")
                    .route(web::get().to(list_submissions))
                    .route(
                        web::post()
                            .to(create_submission)
                            .wrap(middlewares::RequireRole::new(UserRole::Student)),
                    ),
            )
            .route(
                "/{assignment_id}/submissions/me",
                web::get().to(list_my_submissions),
            )
            .service(
                web::resource("/{assignment_id}/comments")
                    .route(web::get().to(list_comments))
                    .route(web::post().to(create_comment)),
            ),
    );
}
