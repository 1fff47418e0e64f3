/*!
 * 速率限制中间件
 *
 * 按客户端 IP 和端点前缀计数，固定时间窗口内超过上限返回 429。
 *
 * ```rust,ignore
 * web::resource("/login")
 *     .wrap(RateLimit::login())
 *     .route(web::post().to(login))
 * ```
 *
 * 默认按 TCP 对端地址计数。部署在反向代理之后时开启
 * `rate_limit.trust_proxy_headers`，并由代理设置 X-Forwarded-For / X-Real-IP。
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpResponse,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    http::header::CONTENT_TYPE,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use moka::future::Cache;
use moka::ops::compute::Op;
use once_cell::sync::Lazy;
use std::net::IpAddr;
use std::rc::Rc;
use std::time::{Duration, Instant};
use tracing::warn;

use crate::config::{AppConfig, RateLimitConfig};
use crate::models::{ApiResponse, ErrorCode};

/// 窗口计数：键为 `前缀:ip`，值为 (窗口起点, 计数)
static RATE_LIMIT_CACHE: Lazy<Cache<String, (Instant, u32)>> = Lazy::new(|| {
    Cache::builder()
        .time_to_idle(Duration::from_secs(3600))
        .max_capacity(100_000)
        .build()
});

#[derive(Clone)]
pub struct RateLimit {
    max_requests: u32,
    window: Duration,
    key_prefix: String,
    trust_proxy_headers: bool,
}

impl RateLimit {
    pub fn new(max_requests: u32, window_secs: u64, prefix: &str) -> Self {
        Self {
            max_requests,
            window: Duration::from_secs(window_secs),
            key_prefix: prefix.to_string(),
            trust_proxy_headers: false,
        }
    }

    pub fn from_config(config: &RateLimitConfig, prefix: &str) -> Self {
        Self {
            trust_proxy_headers: config.trust_proxy_headers,
            ..Self::new(config.auth_max_requests, config.auth_window_secs, prefix)
        }
    }

    pub fn login() -> Self {
        Self::from_config(&AppConfig::get().rate_limit, "login")
    }

    pub fn register() -> Self {
        Self::from_config(&AppConfig::get().rate_limit, "register")
    }

    /// 记录一次请求，返回是否放行；读取和计数在同一次 compute 中完成
    async fn hit(&self, client: &str, now: Instant) -> bool {
        let key = format!("{}:{}", self.key_prefix, client);
        let mut allowed = false;

        RATE_LIMIT_CACHE
            .entry(key.clone())
            .and_compute_with(|entry| {
                let (started, count) = match entry.map(|e| e.into_value()) {
                    Some((started, count)) if now.duration_since(started) < self.window => {
                        (started, count)
                    }
                    _ => (now, 0),
                };
                let op = if count >= self.max_requests {
                    Op::Nop
                } else {
                    allowed = true;
                    Op::Put((started, count + 1))
                };
                std::future::ready(op)
            })
            .await;

        if !allowed {
            warn!("Rate limit exceeded for key: {} (max: {})", key, self.max_requests);
        }
        allowed
    }
}

fn is_valid_ip(ip: &str) -> bool {
    ip.parse::<IpAddr>().is_ok()
}

/// 客户端 IP：默认只用对端地址，配置信任代理时才读取转发头
fn extract_client_ip(req: &ServiceRequest, trust_proxy_headers: bool) -> String {
    let peer_ip = req.peer_addr().map(|addr| addr.ip().to_string());
    if !trust_proxy_headers {
        return peer_ip.unwrap_or_else(|| "unknown".to_string());
    }

    // 只取 X-Forwarded-For 的第一个地址
    if let Some(forwarded) = req.headers().get("X-Forwarded-For")
        && let Ok(value) = forwarded.to_str()
        && let Some(ip) = value.split(',').next()
        && is_valid_ip(ip.trim())
    {
        return ip.trim().to_string();
    }

    if let Some(real_ip) = req.headers().get("X-Real-IP")
        && let Ok(ip) = real_ip.to_str()
        && is_valid_ip(ip.trim())
    {
        return ip.trim().to_string();
    }

    peer_ip.unwrap_or_else(|| "unknown".to_string())
}

fn create_rate_limit_response(retry_after: u64) -> HttpResponse {
    HttpResponse::build(StatusCode::TOO_MANY_REQUESTS)
        .insert_header((CONTENT_TYPE, "application/json; charset=utf-8"))
        .insert_header(("Retry-After", retry_after.to_string()))
        .json(ApiResponse::<()>::error_empty(
            ErrorCode::RateLimitExceeded,
            "Too many requests, please try again later",
        ))
}

impl<S, B> Transform<S, ServiceRequest> for RateLimit
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimitMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddleware {
            service: Rc::new(service),
            limit: self.clone(),
        }))
    }
}

pub struct RateLimitMiddleware<S> {
    service: Rc<S>,
    limit: RateLimit,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddleware<S>
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
        let limit = self.limit.clone();

        Box::pin(async move {
            let client = extract_client_ip(&req, limit.trust_proxy_headers);
            if !limit.hit(&client, Instant::now()).await {
                let retry_after = limit.window.as_secs();
                return Ok(req
                    .into_response(create_rate_limit_response(retry_after).map_into_right_body()));
            }

            let res = srv.call(req).await?.map_into_left_body();
            Ok(res)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config() {
        let config = RateLimitConfig {
            auth_max_requests: 5,
            auth_window_secs: 60,
            trust_proxy_headers: false,
        };
        let login = RateLimit::from_config(&config, "login");
        assert!(!login.trust_proxy_headers);
        assert_eq!(login.max_requests, 5);
        assert_eq!(login.window, Duration::from_secs(60));
        assert_eq!(login.key_prefix, "login");
    }

    #[tokio::test]
    async fn test_window_limits_and_resets() {
        // 前缀区分测试，避免共享全局计数
        let limit = RateLimit::new(2, 60, "test-window");
        let start = Instant::now();

        assert!(limit.hit("10.0.0.1", start).await);
        assert!(limit.hit("10.0.0.1", start).await);
        assert!(!limit.hit("10.0.0.1", start).await);
        // 其他客户端不受影响
        assert!(limit.hit("10.0.0.2", start).await);

        let later = start + Duration::from_secs(61);
        assert!(limit.hit("10.0.0.1", later).await);
    }

    #[tokio::test]
    async fn test_concurrent_hits_respect_limit() {
        let limit = RateLimit::new(5, 60, "test-concurrent");
        let now = Instant::now();

        let results =
            futures_util::future::join_all((0..50).map(|_| limit.hit("10.0.0.9", now))).await;
        assert_eq!(results.iter().filter(|ok| **ok).count(), 5);

        let tasks: Vec<_> = (0..50)
            .map(|_| {
                let limit = limit.clone();
                tokio::spawn(async move { limit.hit("10.0.0.10", now).await })
            })
            .collect();
        let mut allowed = 0;
        for task in tasks {
            if task.await.unwrap() {
                allowed += 1;
            }
        }
        assert_eq!(allowed, 5);
    }

    #[test]
    fn test_forwarded_headers_ignored_without_trust() {
        let peer: std::net::SocketAddr = "192.0.2.1:40000".parse().unwrap();
        let req = || {
            actix_web::test::TestRequest::default()
                .peer_addr(peer)
                .insert_header(("X-Forwarded-For", "203.0.113.7, 10.0.0.1"))
                .insert_header(("X-Real-IP", "203.0.113.8"))
                .to_srv_request()
        };

        assert_eq!(extract_client_ip(&req(), false), "192.0.2.1");
        assert_eq!(extract_client_ip(&req(), true), "203.0.113.7");
    }
}
