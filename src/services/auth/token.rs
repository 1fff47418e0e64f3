use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::errors::ClassroomError;
use crate::models::ApiResponse;
use crate::models::auth::responses::{RefreshTokenResponse, UserInfoResponse};
use crate::services::{current_user, error_response, respond};
use crate::utils::jwt;

use super::AuthService;

pub async fn handle_refresh_token(
    service: &AuthService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    // 从 cookie 中提取 refresh token
    let Some(refresh_token) = jwt::JwtUtils::extract_refresh_token_from_cookie(request) else {
        return Ok(error_response(&ClassroomError::authentication(
            "Unauthorized access, please login",
        )));
    };

    let user_id = match jwt::JwtUtils::verify_refresh_token(&refresh_token) {
        Ok(claims) => claims.user_id(),
        Err(e) => {
            tracing::info!("Refresh token rejected: {}", e);
            None
        }
    };

    // 角色可能在签发后被选择，重新读取用户
    let user = match user_id {
        Some(id) => match storage.get_user_by_id(id).await {
            Ok(user) => user,
            Err(e) => return Ok(error_response(&e)),
        },
        None => None,
    };

    let Some(user) = user else {
        // 清除无效的 refresh token cookie
        let empty_cookie = jwt::JwtUtils::create_empty_refresh_token_cookie();
        let err = ClassroomError::authentication("Login expired or invalid, please login again");
        return Ok(HttpResponse::Unauthorized()
            .cookie(empty_cookie)
            .json(ApiResponse::from_error(&err)));
    };

    match jwt::JwtUtils::generate_access_token(user.id, user.role_str()) {
        Ok(access_token) => {
            let response = RefreshTokenResponse {
                access_token,
                expires_in: jwt::JwtUtils::access_token_expires_in(),
            };
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                response,
                "Token refreshed successfully",
            )))
        }
        Err(e) => Ok(error_response(&ClassroomError::authentication(format!(
            "Failed to generate token: {e}"
        )))),
    }
}

pub async fn handle_get_user(
    _service: &AuthService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    respond(
        current_user(request).map(|user| UserInfoResponse { user }),
        "User information retrieved successfully",
    )
}
