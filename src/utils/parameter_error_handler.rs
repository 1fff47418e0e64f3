//! 请求参数解析失败时返回统一的响应体

use actix_web::{
    Error, HttpRequest, HttpResponse,
    error::{InternalError, JsonPayloadError, PathError, QueryPayloadError},
};

use crate::models::{ApiResponse, ErrorCode};

fn bad_request(err: impl std::fmt::Display + std::fmt::Debug + 'static, message: String) -> Error {
    let response =
        HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::BadRequest, message));
    InternalError::from_response(err, response).into()
}

pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> Error {
    let message = match &err {
        JsonPayloadError::ContentType => "Content type must be application/json".to_string(),
        JsonPayloadError::Overflow { limit } | JsonPayloadError::OverflowKnownLength { limit, .. } => {
            format!("JSON payload exceeds the limit of {limit} bytes")
        }
        JsonPayloadError::Deserialize(e) => format!("Invalid JSON body: {e}"),
        other => format!("Invalid JSON payload: {other}"),
    };
    bad_request(err, message)
}

pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> Error {
    let message = format!("Invalid query parameters: {err}");
    bad_request(err, message)
}

pub fn path_error_handler(err: PathError, _req: &HttpRequest) -> Error {
    let message = format!("Invalid path parameters: {err}");
    bad_request(err, message)
}
