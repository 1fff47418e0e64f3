use serde::{Deserialize, Serialize};

use crate::errors::ClassroomError;
use crate::models::ErrorCode;

// 统一的API响应结构
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Success as i32,
            message: message.into(),
            data: Some(data),
            error: None,
            timestamp: chrono::Utc::now(),
        }
    }
}

impl ApiResponse<()> {
    pub fn success_empty(message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Success as i32,
            message: message.into(),
            data: None,
            error: None,
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn error_empty(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code as i32,
            message: message.into(),
            data: None,
            error: Some(code.transport_name().to_string()),
            timestamp: chrono::Utc::now(),
        }
    }

    /// 基础设施错误不向客户端暴露细节
    pub fn from_error(err: &ClassroomError) -> Self {
        let code = ErrorCode::from(err);
        let message = if err.is_internal() {
            "Internal server error".to_string()
        } else {
            err.message().to_string()
        };
        Self {
            code: code as i32,
            message,
            data: None,
            error: Some(err.transport_code().to_string()),
            timestamp: chrono::Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_serialization() {
        let resp = ApiResponse::success(vec![1, 2], "ok");
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["code"], 0);
        assert_eq!(json["data"], serde_json::json!([1, 2]));
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_from_error_hides_internal_details() {
        let resp = ApiResponse::from_error(&ClassroomError::database_operation("secret dsn"));
        assert_eq!(resp.error.as_deref(), Some("INTERNAL_SERVER_ERROR"));
        assert!(!resp.message.contains("secret"));

        let resp = ApiResponse::from_error(&ClassroomError::forbidden("Wrong password"));
        assert_eq!(resp.error.as_deref(), Some("FORBIDDEN"));
        assert_eq!(resp.code, ErrorCode::Forbidden as i32);
        assert_eq!(resp.message, "Wrong password");
    }
}
