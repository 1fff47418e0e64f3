pub mod assignments;
pub mod attachments;
pub mod auth;
pub mod classrooms;
pub mod comments;
pub mod common;
pub mod objects;
pub mod ratings;
pub mod subjects;
pub mod submissions;
pub mod users;

pub use common::*;

use crate::errors::ClassroomError;

/// 响应体中的业务码
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1003,
    NotFound = 1004,
    Conflict = 1009,
    RateLimitExceeded = 1029,

    InternalServerError = 5000,
}

impl ErrorCode {
    /// 传输层错误名称
    pub fn transport_name(self) -> &'static str {
        match self {
            ErrorCode::Success => "OK",
            ErrorCode::BadRequest => "BAD_REQUEST",
            ErrorCode::Unauthorized => "UNAUTHORIZED",
            ErrorCode::Forbidden => "FORBIDDEN",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::Conflict => "CONFLICT",
            ErrorCode::RateLimitExceeded => "TOO_MANY_REQUESTS",
            ErrorCode::InternalServerError => "INTERNAL_SERVER_ERROR",
        }
    }
}

impl From<&ClassroomError> for ErrorCode {
    fn from(err: &ClassroomError) -> Self {
        match err.transport_code() {
            "UNAUTHORIZED" => ErrorCode::Unauthorized,
            "FORBIDDEN" => ErrorCode::Forbidden,
            "NOT_FOUND" => ErrorCode::NotFound,
            "BAD_REQUEST" => ErrorCode::BadRequest,
            "CONFLICT" => ErrorCode::Conflict,
            _ => ErrorCode::InternalServerError,
        }
    }
}

/// 以文本形式存储的枚举：生成 Display / FromStr / Serialize / Deserialize
macro_rules! define_string_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $label:literal {
            $($variant:ident => $text:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant,)+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    _ => Err(format!(
                        concat!("Invalid ", $label, ": '{}'. Supported: {}"),
                        s,
                        [$($text),+].join(", ")
                    )),
                }
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(
                &self,
                serializer: S,
            ) -> std::result::Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(
                deserializer: D,
            ) -> std::result::Result<Self, D::Error> {
                let s = <String as serde::Deserialize>::deserialize(deserializer)?;
                s.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

pub(crate) use define_string_enum;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_from_classroom_error() {
        assert_eq!(
            ErrorCode::from(&ClassroomError::authorization("x")),
            ErrorCode::Unauthorized
        );
        assert_eq!(
            ErrorCode::from(&ClassroomError::validation("x")),
            ErrorCode::BadRequest
        );
        assert_eq!(
            ErrorCode::from(&ClassroomError::object_store("x")),
            ErrorCode::InternalServerError
        );
        assert_eq!(ErrorCode::Forbidden.transport_name(), "FORBIDDEN");
    }
}
