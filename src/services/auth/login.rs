use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::warn;

use super::AuthService;
use crate::errors::{ClassroomError, Result};
use crate::models::{
    ApiResponse,
    auth::{requests::LoginRequest, responses::LoginResponse},
    users::entities::User,
};
use crate::services::error_response;
use crate::storage::Storage;
use crate::utils::jwt;
use crate::utils::password::verify_password;

/// 未勾选“记住我”时 refresh token 的有效期
const SHORT_SESSION_DAYS: i64 = 1;

/// 以用户名或邮箱加密码校验身份，成功后更新最后登录时间
pub async fn authenticate(
    storage: &Arc<dyn Storage>,
    identifier: &str,
    password: &str,
) -> Result<User> {
    let identifier = identifier.trim();
    let user = storage
        .get_user_by_username_or_email(identifier)
        .await?
        .filter(|user| verify_password(password, &user.password_hash))
        .ok_or_else(|| ClassroomError::authentication("Username or password is incorrect"))?;

    if let Err(e) = storage.update_last_login(user.id).await {
        warn!("Failed to update last login for user {}: {}", user.id, e);
    }
    Ok(user)
}

pub async fn handle_login(
    service: &AuthService,
    login_request: LoginRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let config = service.get_config();

    // 1. 校验身份
    let user = match authenticate(&storage, &login_request.username, &login_request.password).await
    {
        Ok(user) => user,
        Err(e) => return Ok(error_response(&e)),
    };

    // 2. 生成令牌对
    let refresh_expiry =
        (!login_request.remember_me).then(|| chrono::Duration::days(SHORT_SESSION_DAYS));
    let token_pair = match user.generate_token_pair(refresh_expiry) {
        Ok(pair) => pair,
        Err(e) => {
            tracing::error!("Failed to generate JWT token: {}", e);
            return Ok(error_response(&e));
        }
    };

    tracing::info!("User {} logged in successfully", user.username);

    let response = LoginResponse {
        access_token: token_pair.access_token,
        expires_in: config.jwt.access_token_expiry * 60, // 转换为秒
        user,
        created_at: chrono::Utc::now(),
    };

    // 3. 写入 refresh token cookie
    let refresh_cookie = jwt::JwtUtils::create_refresh_token_cookie(&token_pair.refresh_token);

    Ok(HttpResponse::Ok()
        .cookie(refresh_cookie)
        .json(ApiResponse::success(response, "Login successful")))
}
