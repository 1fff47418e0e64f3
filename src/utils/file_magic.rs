//! 文件头校验
//!
//! 扩展名均为小写且带点号，如 `.png`。

const IMAGE_EXTENSIONS: &[&str] = &[".png", ".jpg", ".jpeg", ".gif", ".webp"];

const OLE_HEADER: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];
const ZIP_HEADER: &[u8] = &[0x50, 0x4B, 0x03, 0x04];

/// 取文件名的扩展名（小写，带点号）
pub fn extension_of(filename: &str) -> Option<String> {
    let (stem, ext) = filename.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(format!(".{}", ext.to_ascii_lowercase()))
}

pub fn is_image_extension(extension: &str) -> bool {
    IMAGE_EXTENSIONS.contains(&extension.to_ascii_lowercase().as_str())
}

/// 文件头是否与扩展名相符，未知扩展名一律拒绝
pub fn validate_magic_bytes(data: &[u8], extension: &str) -> bool {
    if data.is_empty() {
        return false;
    }

    match extension.to_ascii_lowercase().as_str() {
        ".png" => data.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]),
        ".jpg" | ".jpeg" => data.starts_with(&[0xFF, 0xD8, 0xFF]),
        ".gif" => data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a"),
        ".webp" => data.len() >= 12 && data.starts_with(b"RIFF") && &data[8..12] == b"WEBP",

        ".pdf" => data.starts_with(b"%PDF"),
        ".doc" | ".xls" | ".ppt" => data.starts_with(OLE_HEADER),
        ".docx" | ".xlsx" | ".pptx" | ".zip" => data.starts_with(ZIP_HEADER),
        ".7z" => data.starts_with(&[b'7', b'z', 0xBC, 0xAF, 0x27, 0x1C]),
        ".gz" => data.starts_with(&[0x1F, 0x8B]),

        // 纯文本：开头部分必须是合法 UTF-8（允许截断在多字节字符中间）
        ".txt" | ".md" | ".csv" | ".json" => match std::str::from_utf8(data) {
            Ok(_) => true,
            Err(e) => e.error_len().is_none(),
        },

        _ => false,
    }
}

/// 下载时使用的 Content-Type
pub fn content_type_for(extension: &str) -> &'static str {
    match extension.to_ascii_lowercase().as_str() {
        ".png" => "image/png",
        ".jpg" | ".jpeg" => "image/jpeg",
        ".gif" => "image/gif",
        ".webp" => "image/webp",
        ".pdf" => "application/pdf",
        ".txt" | ".md" | ".csv" => "text/plain; charset=utf-8",
        ".json" => "application/json",
        ".zip" => "application/zip",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("Essay.PDF").as_deref(), Some(".pdf"));
        assert_eq!(extension_of("archive.tar.gz").as_deref(), Some(".gz"));
        assert_eq!(extension_of("README"), None);
        assert_eq!(extension_of(".hidden"), None);
        assert_eq!(extension_of("trailing."), None);
    }

    #[test]
    fn test_content_type_for() {
        assert_eq!(content_type_for(".PNG"), "image/png");
        assert_eq!(content_type_for(".docx"), "application/octet-stream");
    }

    #[test]
    fn test_images() {
        let png = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
        assert!(validate_magic_bytes(&png, ".png"));
        assert!(validate_magic_bytes(&png, ".PNG"));
        assert!(!validate_magic_bytes(&png, ".jpg"));
        assert!(validate_magic_bytes(&[0xFF, 0xD8, 0xFF, 0xE0], ".jpeg"));
        assert!(is_image_extension(".webp"));
        assert!(!is_image_extension(".pdf"));
    }

    #[test]
    fn test_documents() {
        assert!(validate_magic_bytes(b"%PDF-1.7", ".pdf"));
        assert!(!validate_magic_bytes(b"%PDF-1.7", ".docx"));
        assert!(validate_magic_bytes(&[0x50, 0x4B, 0x03, 0x04, 0x14], ".docx"));
    }

    #[test]
    fn test_text() {
        assert!(validate_magic_bytes("héllo".as_bytes(), ".txt"));
        // 多字节字符被截断
        assert!(validate_magic_bytes(&"é".as_bytes()[..1], ".md"));
        assert!(!validate_magic_bytes(&[0xFF, 0xFE, 0x00], ".csv"));
    }

    #[test]
    fn test_rejects_empty_and_unknown() {
        assert!(!validate_magic_bytes(&[], ".png"));
        assert!(!validate_magic_bytes(b"MZ", ".exe"));
    }
}
