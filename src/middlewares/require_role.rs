/*!
 * 基于角色的访问控制中间件
 *
 * 必须在 RequireJWT 之后使用。未选择角色的用户一律拒绝。
 *
 * ```rust,ignore
 * web::scope("/api/v1/subjects")
 *     .wrap(RequireRole::new(UserRole::Teacher))
 *     .wrap(RequireJWT)
 * ```
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use tracing::info;

use super::create_error_response;
use crate::{
    middlewares::RequireJWT,
    models::{ErrorCode, users::entities::UserRole},
};

#[derive(Clone)]
pub struct RequireRole {
    allowed_roles: Vec<UserRole>,
}

impl RequireRole {
    pub fn new(role: UserRole) -> Self {
        Self {
            allowed_roles: vec![role],
        }
    }

    /// 任一角色即可
    pub fn new_any(roles: &[UserRole]) -> Self {
        Self {
            allowed_roles: roles.to_vec(),
        }
    }

    fn permits(&self, role: Option<UserRole>) -> bool {
        role.is_some_and(|r| self.allowed_roles.contains(&r))
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireRole
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireRoleMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireRoleMiddleware {
            service: Rc::new(service),
            policy: self.clone(),
        }))
    }
}

pub struct RequireRoleMiddleware<S> {
    service: Rc<S>,
    policy: RequireRole,
}

impl<S, B> Service<ServiceRequest> for RequireRoleMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let policy = self.policy.clone();

        Box::pin(async move {
            let Some(user_id) = RequireJWT::extract_user_id(req.request()) else {
                info!(
                    "Role check failed: no session user in request. Make sure RequireJWT middleware is applied first."
                );
                return Ok(req.into_response(
                    create_error_response(
                        StatusCode::UNAUTHORIZED,
                        ErrorCode::Unauthorized,
                        "Authentication required",
                    )
                    .map_into_right_body(),
                ));
            };

            let role = RequireJWT::extract_user_role(req.request());
            if policy.permits(role) {
                return Ok(srv.call(req).await?.map_into_left_body());
            }

            info!(
                "Access denied for user {} (role: {:?}). Allowed roles: {:?}",
                user_id, role, policy.allowed_roles
            );
            Ok(req.into_response(
                create_error_response(
                    StatusCode::UNAUTHORIZED,
                    ErrorCode::Unauthorized,
                    "Access denied for your role",
                )
                .map_into_right_body(),
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_policy() {
        let teacher_only = RequireRole::new(UserRole::Teacher);
        assert!(teacher_only.permits(Some(UserRole::Teacher)));
        assert!(!teacher_only.permits(Some(UserRole::Student)));
        assert!(!teacher_only.permits(None));

        let any = RequireRole::new_any(&[UserRole::Teacher, UserRole::Student]);
        assert!(any.permits(Some(UserRole::Student)));
        assert!(!any.permits(None));
    }
}
