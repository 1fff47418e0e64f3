pub mod avatar;
pub mod profile;
pub mod role;

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::users::requests::{SelectRoleRequest, UpdateProfileRequest};

use super::define_service;

define_service!(UserService);

impl UserService {
    // 获取当前用户资料
    pub async fn get_me(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        profile::handle_get_me(self, request).await
    }

    pub async fn update_me(
        &self,
        request: &HttpRequest,
        update: UpdateProfileRequest,
    ) -> ActixResult<HttpResponse> {
        profile::handle_update_me(self, request, update).await
    }

    // 一次性选择角色
    pub async fn select_role(
        &self,
        request: &HttpRequest,
        body: SelectRoleRequest,
    ) -> ActixResult<HttpResponse> {
        role::handle_select_role(self, request, body).await
    }

    pub async fn upload_avatar(
        &self,
        request: &HttpRequest,
        payload: Multipart,
    ) -> ActixResult<HttpResponse> {
        avatar::handle_upload_avatar(self, request, payload).await
    }

    // 获取其他用户的公开资料
    pub async fn get_user(&self, request: &HttpRequest, user_id: i64) -> ActixResult<HttpResponse> {
        profile::handle_get_user(self, request, user_id).await
    }
}
