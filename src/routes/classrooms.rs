use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::PaginationQuery;
use crate::models::assignments::requests::CreateAssignmentRequest;
use crate::models::classrooms::requests::{
    BrowseClassroomsParams, CreateClassroomRequest, EnrollRequest, UpdateClassroomRequest,
};
use crate::models::ratings::requests::SetRatingRequest;
use crate::models::users::entities::UserRole;
use crate::services::{AssignmentService, ClassroomService};

// 懒加载的全局服务实例
static CLASSROOM_SERVICE: Lazy<ClassroomService> = Lazy::new(ClassroomService::new_lazy);
static ASSIGNMENT_SERVICE: Lazy<AssignmentService> = Lazy::new(AssignmentService::new_lazy);

// HTTP处理程序
pub async fn list_classrooms(
    req: HttpRequest,
    query: web::Query<PaginationQuery>,
) -> ActixResult<HttpResponse> {
    CLASSROOM_SERVICE
        .list_classrooms(&req, query.into_inner())
        .await
}

pub async fn browse_classrooms(
    req: HttpRequest,
    query: web::Query<BrowseClassroomsParams>,
) -> ActixResult<HttpResponse> {
    CLASSROOM_SERVICE
        .browse_classrooms(&req, query.into_inner())
        .await
}

pub async fn create_classroom(
    req: HttpRequest,
    body: web::Json<CreateClassroomRequest>,
) -> ActixResult<HttpResponse> {
    CLASSROOM_SERVICE
        .create_classroom(&req, body.into_inner())
        .await
}

pub async fn get_classroom(
    req: HttpRequest,
    classroom_id: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    CLASSROOM_SERVICE
        .get_classroom(&req, classroom_id.into_inner())
        .await
}

pub async fn update_classroom(
    req: HttpRequest,
    classroom_id: web::Path<i64>,
    body: web::Json<UpdateClassroomRequest>,
) -> ActixResult<HttpResponse> {
    CLASSROOM_SERVICE
        .update_classroom(&req, classroom_id.into_inner(), body.into_inner())
        .await
}

pub async fn delete_classroom(
    req: HttpRequest,
    classroom_id: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    CLASSROOM_SERVICE
        .delete_classroom(&req, classroom_id.into_inner())
        .await
}

// 公开教室可以不带请求体
pub async fn enroll(
    req: HttpRequest,
    classroom_id: web::Path<i64>,
    body: Option<web::Json<EnrollRequest>>,
) -> ActixResult<HttpResponse> {
    let body = body.map(|b| b.into_inner()).unwrap_or_default();
    CLASSROOM_SERVICE
        .enroll(&req, classroom_id.into_inner(), body)
        .await
}

pub async fn leave(req: HttpRequest, classroom_id: web::Path<i64>) -> ActixResult<HttpResponse> {
    CLASSROOM_SERVICE.leave(&req, classroom_id.into_inner()).await
}

pub async fn list_students(
    req: HttpRequest,
    classroom_id: web::Path<i64>,
    query: web::Query<PaginationQuery>,
) -> ActixResult<HttpResponse> {
    CLASSROOM_SERVICE
        .list_students(&req, classroom_id.into_inner(), query.into_inner())
        .await
}

pub async fn remove_student(
    req: HttpRequest,
    path: web::Path<(i64, i64)>,
) -> ActixResult<HttpResponse> {
    let (classroom_id, student_id) = path.into_inner();
    CLASSROOM_SERVICE
        .remove_student(&req, classroom_id, student_id)
        .await
}

pub async fn list_ratings(
    req: HttpRequest,
    classroom_id: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    CLASSROOM_SERVICE
        .list_ratings(&req, classroom_id.into_inner())
        .await
}

pub async fn get_my_rating(
    req: HttpRequest,
    classroom_id: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    CLASSROOM_SERVICE
        .get_my_rating(&req, classroom_id.into_inner())
        .await
}

pub async fn set_rating(
    req: HttpRequest,
    path: web::Path<(i64, i64)>,
    body: web::Json<SetRatingRequest>,
) -> ActixResult<HttpResponse> {
    let (classroom_id, student_id) = path.into_inner();
    CLASSROOM_SERVICE
        .set_rating(&req, classroom_id, student_id, body.into_inner())
        .await
}

pub async fn list_assignments(
    req: HttpRequest,
    classroom_id: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE
        .list_assignments(&req, classroom_id.into_inner())
        .await
}

pub async fn create_assignment(
    req: HttpRequest,
    classroom_id: web::Path<i64>,
    body: web::Json<CreateAssignmentRequest>,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE
        .create_assignment(&req, classroom_id.into_inner(), body.into_inner())
        .await
}

// 配置路由
pub fn configure_classroom_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/classrooms")
            .wrap(middlewares::RequireJWT)
            .service(
                // 教师看到自己创建的教室，学生看到已加入的教室
                web::resource("")
                    .route(web::get().to(list_classrooms))
                    .route(
                        web::post()
                            .to(create_classroom)
                            .wrap(middlewares::RequireRole::new(UserRole::Teacher)),
                    ),
            )
            // 必须在 /{classroom_id} 之前注册
            .route("/browse", web::get().to(browse_classrooms))
            .service(
                web::resource("/{classroom_id}")
                    .route(web::get().to(get_classroom))
                    .route(web::put().to(update_classroom))
                    .route(web::delete().to(delete_classroom)),
            )
            .service(
                web::resource("/{classroom_id}/enroll")
                    .wrap(middlewares::RequireRole::new(UserRole::Student))
                    .route(web::post().to(enroll))
                    .route(web::delete().to(leave)),
            )
            .route("/{classroom_id}/students", web::get().to(list_students))
            .route(
                "/{classroom_id}/students/{student_id}",
                web::delete().to(remove_student),
            )
            .route("/{classroom_id}/ratings", web::get().to(list_ratings))
            .route("/{classroom_id}/ratings/me", web::get().to(get_my_rating))
            .route(
                "/{classroom_id}/ratings/{student_id}",
                web::put().to(set_rating),
            )
            .service(
                web::resource("/{classroom_id}/assignments")
                    .route(web::get().to(list_assignments))
                    .route(web::post().to(create_assignment)),
            ),
    );
}
