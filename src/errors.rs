//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码、类型名称和 HTTP 状态码。

use std::fmt;

use actix_web::http::StatusCode;

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - status_code() 方法 - 返回对应的 HTTP 状态码
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_classroom_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal, $status:ident)
    ),* $(,)?) => {
        #[derive(Debug, Clone)]
        pub enum ClassroomError {
            $($variant(String),)*
        }

        impl ClassroomError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(ClassroomError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(ClassroomError::$variant(_) => $type_name,)*
                }
            }

            /// 获取 HTTP 状态码
            pub fn status_code(&self) -> StatusCode {
                match self {
                    $(ClassroomError::$variant(_) => StatusCode::$status,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(ClassroomError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl ClassroomError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        ClassroomError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_classroom_errors! {
    CacheConnection("E001", "Cache Connection Error", INTERNAL_SERVER_ERROR),
    CachePluginNotFound("E002", "Cache Plugin Not Found", INTERNAL_SERVER_ERROR),
    DatabaseConfig("E003", "Database Configuration Error", INTERNAL_SERVER_ERROR),
    DatabaseConnection("E004", "Database Connection Error", INTERNAL_SERVER_ERROR),
    DatabaseOperation("E005", "Database Operation Error", INTERNAL_SERVER_ERROR),
    FileOperation("E006", "File Operation Error", INTERNAL_SERVER_ERROR),
    Validation("E007", "Validation Error", BAD_REQUEST),
    NotFound("E008", "Resource Not Found", NOT_FOUND),
    Serialization("E009", "Serialization Error", INTERNAL_SERVER_ERROR),
    ObjectStorePluginNotFound("E010", "Object Store Plugin Not Found", INTERNAL_SERVER_ERROR),
    DateParse("E011", "Date Parse Error", BAD_REQUEST),
    Authentication("E012", "Authentication Error", UNAUTHORIZED),
    Authorization("E013", "Authorization Error", UNAUTHORIZED),
    Forbidden("E014", "Forbidden", FORBIDDEN),
    BadRequest("E015", "Bad Request", BAD_REQUEST),
    Conflict("E016", "Conflict", CONFLICT),
    ObjectStore("E017", "Object Store Error", INTERNAL_SERVER_ERROR),
}

impl ClassroomError {
    /// 传输层错误名称（UNAUTHORIZED / NOT_FOUND / BAD_REQUEST / FORBIDDEN ...）
    pub fn transport_code(&self) -> &'static str {
        match self {
            ClassroomError::Authentication(_) | ClassroomError::Authorization(_) => "UNAUTHORIZED",
            ClassroomError::Forbidden(_) => "FORBIDDEN",
            ClassroomError::NotFound(_) => "NOT_FOUND",
            ClassroomError::Validation(_)
            | ClassroomError::BadRequest(_)
            | ClassroomError::DateParse(_) => "BAD_REQUEST",
            ClassroomError::Conflict(_) => "CONFLICT",
            _ => "INTERNAL_SERVER_ERROR",
        }
    }

    /// 是否属于基础设施错误（需要记录日志，不直接暴露细节）
    pub fn is_internal(&self) -> bool {
        self.status_code().is_server_error()
    }

    /// 格式化为彩色输出（用于开发环境）
    #[cfg(debug_assertions)]
    pub fn format_colored(&self) -> String {
        format!(
            "\x1b[1;31m[ERROR]\x1b[0m \x1b[33m{}\x1b[0m \x1b[31m{}\x1b[0m\n  {}",
            self.code(),
            self.error_type(),
            self.message()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for ClassroomError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for ClassroomError {}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for ClassroomError {
    fn from(err: sea_orm::DbErr) -> Self {
        ClassroomError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for ClassroomError {
    fn from(err: std::io::Error) -> Self {
        ClassroomError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for ClassroomError {
    fn from(err: serde_json::Error) -> Self {
        ClassroomError::Serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for ClassroomError {
    fn from(err: chrono::ParseError) -> Self {
        ClassroomError::DateParse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ClassroomError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(ClassroomError::cache_connection("test").code(), "E001");
        assert_eq!(ClassroomError::database_config("test").code(), "E003");
        assert_eq!(ClassroomError::validation("test").code(), "E007");
        assert_eq!(ClassroomError::authorization("test").code(), "E013");
        assert_eq!(ClassroomError::object_store("test").code(), "E017");
    }

    #[test]
    fn test_error_types() {
        assert_eq!(
            ClassroomError::cache_connection("test").error_type(),
            "Cache Connection Error"
        );
        assert_eq!(
            ClassroomError::bad_request("test").error_type(),
            "Bad Request"
        );
    }

    #[test]
    fn test_transport_codes() {
        assert_eq!(
            ClassroomError::authorization("x").transport_code(),
            "UNAUTHORIZED"
        );
        assert_eq!(
            ClassroomError::authentication("x").transport_code(),
            "UNAUTHORIZED"
        );
        assert_eq!(ClassroomError::forbidden("x").transport_code(), "FORBIDDEN");
        assert_eq!(ClassroomError::not_found("x").transport_code(), "NOT_FOUND");
        assert_eq!(
            ClassroomError::validation("x").transport_code(),
            "BAD_REQUEST"
        );
        assert_eq!(
            ClassroomError::database_operation("x").transport_code(),
            "INTERNAL_SERVER_ERROR"
        );
    }

    #[test]
    fn test_internal_errors() {
        assert!(ClassroomError::database_operation("x").is_internal());
        assert!(ClassroomError::object_store("x").is_internal());
        assert!(!ClassroomError::forbidden("x").is_internal());
    }

    #[test]
    fn test_error_message() {
        let err = ClassroomError::validation("Invalid input");
        assert_eq!(err.message(), "Invalid input");
    }

    #[test]
    fn test_format_simple() {
        let err = ClassroomError::bad_request("Role already set");
        let formatted = err.format_simple();
        assert!(formatted.contains("Bad Request"));
        assert!(formatted.contains("Role already set"));
    }

    #[test]
    fn test_db_err_conversion() {
        let err: ClassroomError = sea_orm::DbErr::Custom("boom".into()).into();
        assert_eq!(err.code(), "E005");
        assert!(err.message().contains("boom"));
    }
}
