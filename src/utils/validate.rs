use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::{ClassroomError, Result};

static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("Invalid username regex"));

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("Invalid email regex")
});

static LANGUAGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z]{2,3}(-[A-Za-z0-9]{2,8})*$").expect("Invalid language regex"));

pub const MAX_FILENAME_BYTES: usize = 255;
pub const MAX_NAME_CHARS: usize = 100;
pub const MAX_TEXT_CHARS: usize = 5000;

pub fn validate_username(username: &str) -> Result<()> {
    // 长度 3..=32
    if username.len() < 3 || username.len() > 32 {
        return Err(ClassroomError::validation(
            "Username length must be between 3 and 32 characters",
        ));
    }
    if !USERNAME_RE.is_match(username) {
        return Err(ClassroomError::validation(
            "Username must contain only letters, numbers, underscores or hyphens",
        ));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<()> {
    if email.len() > 254 || !EMAIL_RE.is_match(email) {
        return Err(ClassroomError::validation("Email format is invalid"));
    }
    Ok(())
}

/// 密码策略：至少 8 位，同时包含大写字母、小写字母与数字
pub fn validate_password(password: &str) -> Result<()> {
    let mut errors = Vec::new();

    if password.chars().count() < 8 {
        errors.push("Password must be at least 8 characters long");
    }
    if password.len() > 128 {
        errors.push("Password must be at most 128 bytes long");
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        errors.push("Password must contain at least one uppercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        errors.push("Password must contain at least one lowercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        errors.push("Password must contain at least one digit");
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ClassroomError::validation(errors.join("; ")))
    }
}

/// 名称类字段：去除首尾空白后非空且不超过 100 个字符
pub fn validate_name(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ClassroomError::validation(format!("{field} must not be empty")));
    }
    if trimmed.chars().count() > MAX_NAME_CHARS {
        return Err(ClassroomError::validation(format!(
            "{field} must be at most {MAX_NAME_CHARS} characters"
        )));
    }
    Ok(trimmed.to_string())
}

/// 长文本字段（描述、简介、评论）
pub fn validate_text(field: &str, value: &str) -> Result<String> {
    if value.chars().count() > MAX_TEXT_CHARS {
        return Err(ClassroomError::validation(format!(
            "{field} must be at most {MAX_TEXT_CHARS} characters"
        )));
    }
    Ok(value.trim().to_string())
}

/// 语言标签，如 `en`、`zh-CN`
pub fn validate_language(language: &str) -> Result<String> {
    let language = language.trim();
    if !LANGUAGE_RE.is_match(language) {
        return Err(ClassroomError::validation(format!(
            "Invalid language tag: '{language}'"
        )));
    }
    Ok(language.to_string())
}

/// 清洗文件名：去除路径分隔符和控制字符，结果非空且不超过 255 字节
pub fn sanitize_filename(filename: &str) -> Result<String> {
    let cleaned: String = filename
        .chars()
        .filter(|c| !matches!(c, '/' | '\\') && !c.is_control())
        .collect();
    let cleaned = cleaned.trim();

    if cleaned.is_empty() || cleaned.chars().all(|c| c == '.') {
        return Err(ClassroomError::validation("Filename must not be empty"));
    }
    if cleaned.len() > MAX_FILENAME_BYTES {
        return Err(ClassroomError::validation(format!(
            "Filename must be at most {MAX_FILENAME_BYTES} bytes"
        )));
    }
    Ok(cleaned.to_string())
}
