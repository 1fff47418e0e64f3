use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::users::requests::{SelectRoleRequest, UpdateProfileRequest};
use crate::services::UserService;

// 懒加载的全局 UserService 实例
static USER_SERVICE: Lazy<UserService> = Lazy::new(UserService::new_lazy);

pub async fn get_me(req: HttpRequest) -> ActixResult<HttpResponse> {
    USER_SERVICE.get_me(&req).await
}

pub async fn update_me(
    req: HttpRequest,
    update_data: web::Json<UpdateProfileRequest>,
) -> ActixResult<HttpResponse> {
    USER_SERVICE.update_me(&req, update_data.into_inner()).await
}

pub async fn select_role(
    req: HttpRequest,
    body: web::Json<SelectRoleRequest>,
) -> ActixResult<HttpResponse> {
    USER_SERVICE.select_role(&req, body.into_inner()).await
}

pub async fn upload_avatar(req: HttpRequest, payload: Multipart) -> ActixResult<HttpResponse> {
    USER_SERVICE.upload_avatar(&req, payload).await
}

pub async fn get_user(req: HttpRequest, user_id: web::Path<i64>) -> ActixResult<HttpResponse> {
    USER_SERVICE.get_user(&req, user_id.into_inner()).await
}

// 配置路由
pub fn configure_user_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/users")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("/me")
                    .route(web::get().to(get_me))
                    .route(web::put().to(update_me)),
            )
            // 角色只能选择一次，未选择角色的用户也可访问
            .route("/me/role", web::post().to(select_role))
            .route("/me/avatar", web::post().to(upload_avatar))
            .route("/{user_id}", web::get().to(get_user)),
    );
}
