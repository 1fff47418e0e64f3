//! 对象键布局
//!
//! ```text
//! classrooms/{cid}/assignments/{aid}/attachments/{uuid}-{filename}
//! classrooms/{cid}/assignments/{aid}/submissions/{student_id}/{uuid}-{filename}
//! avatars/{user_id}/{uuid}.{ext}
//! ```

use uuid::Uuid;

pub const AVATAR_PREFIX: &str = "avatars/";

/// 单个路径段的最大字节数（常见文件系统的 NAME_MAX）
const MAX_COMPONENT_BYTES: usize = 255;

pub fn classroom_prefix(classroom_id: i64) -> String {
    format!("classrooms/{classroom_id}/")
}

pub fn assignment_prefix(classroom_id: i64, assignment_id: i64) -> String {
    format!("classrooms/{classroom_id}/assignments/{assignment_id}/")
}

/// 在字符边界处截断到不超过 `max` 字节
fn truncate_at_char_boundary(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// `{uuid}-{filename}` 段，超长时截断主名并保留扩展名
fn unique_component(filename: &str) -> String {
    let uuid = Uuid::new_v4().to_string();
    let budget = MAX_COMPONENT_BYTES - uuid.len() - 1;
    if filename.len() <= budget {
        return format!("{uuid}-{filename}");
    }

    let (stem, ext) = match filename.rfind('.') {
        Some(pos) if pos > 0 && filename.len() - pos < budget => filename.split_at(pos),
        _ => (filename, ""),
    };
    let stem = truncate_at_char_boundary(stem, budget - ext.len());
    format!("{uuid}-{stem}{ext}")
}

/// `filename` 需已经过清洗；数据库中保存完整文件名，键中可能被截断
pub fn attachment_key(classroom_id: i64, assignment_id: i64, filename: &str) -> String {
    format!(
        "{}attachments/{}",
        assignment_prefix(classroom_id, assignment_id),
        unique_component(filename)
    )
}

pub fn submission_key(
    classroom_id: i64,
    assignment_id: i64,
    student_id: i64,
    filename: &str,
) -> String {
    format!(
        "{}submissions/{}/{}",
        assignment_prefix(classroom_id, assignment_id),
        student_id,
        unique_component(filename)
    )
}

pub fn avatar_key(user_id: i64, ext: &str) -> String {
    format!("{AVATAR_PREFIX}{user_id}/{}.{ext}", Uuid::new_v4())
}

/// 对象键所属的业务类别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKeyKind {
    Attachment {
        classroom_id: i64,
        assignment_id: i64,
    },
    Submission {
        classroom_id: i64,
        assignment_id: i64,
        student_id: i64,
    },
    Avatar {
        user_id: i64,
    },
}

/// 解析对象键，不符合布局的键返回 None
pub fn parse_object_key(key: &str) -> Option<ObjectKeyKind> {
    let parts: Vec<&str> = key.split('/').collect();
    match parts.as_slice() {
        ["avatars", uid, file] if !file.is_empty() => Some(ObjectKeyKind::Avatar {
            user_id: uid.parse().ok()?,
        }),
        ["classrooms", cid, "assignments", aid, "attachments", file] if !file.is_empty() => {
            Some(ObjectKeyKind::Attachment {
                classroom_id: cid.parse().ok()?,
                assignment_id: aid.parse().ok()?,
            })
        }
        ["classrooms", cid, "assignments", aid, "submissions", sid, file] if !file.is_empty() => {
            Some(ObjectKeyKind::Submission {
                classroom_id: cid.parse().ok()?,
                assignment_id: aid.parse().ok()?,
                student_id: sid.parse().ok()?,
            })
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_layout() {
        let key = attachment_key(3, 7, "notes.pdf");
        assert!(key.starts_with("classrooms/3/assignments/7/attachments/"));
        assert!(key.ends_with("-notes.pdf"));

        let key = submission_key(3, 7, 11, "essay.docx");
        assert!(key.starts_with("classrooms/3/assignments/7/submissions/11/"));

        let key = avatar_key(5, "png");
        assert!(key.starts_with("avatars/5/"));
        assert!(key.ends_with(".png"));
    }

    #[test]
    fn test_parse_object_key() {
        assert_eq!(
            parse_object_key(&attachment_key(1, 2, "a.pdf")),
            Some(ObjectKeyKind::Attachment {
                classroom_id: 1,
                assignment_id: 2
            })
        );
        assert_eq!(
            parse_object_key(&submission_key(1, 2, 3, "a.pdf")),
            Some(ObjectKeyKind::Submission {
                classroom_id: 1,
                assignment_id: 2,
                student_id: 3
            })
        );
        assert_eq!(
            parse_object_key(&avatar_key(9, "jpg")),
            Some(ObjectKeyKind::Avatar { user_id: 9 })
        );
        assert_eq!(parse_object_key("classrooms/x/assignments/2/attachments/a"), None);
        assert_eq!(parse_object_key("random/key"), None);
    }

    #[test]
    fn test_long_filename_component_fits() {
        let long = format!("{}.pdf", "a".repeat(251));
        for key in [attachment_key(1, 2, &long), submission_key(1, 2, 3, &long)] {
            let last = key.rsplit('/').next().unwrap();
            assert_eq!(last.len(), MAX_COMPONENT_BYTES);
            assert!(last.ends_with("a.pdf"));
        }

        // 多字节字符不会被截断在中间
        let wide = "文".repeat(85);
        let last = unique_component(&wide);
        assert!(last.len() <= MAX_COMPONENT_BYTES);
        assert!(last.ends_with('文'));

        let short = unique_component("notes.pdf");
        assert!(short.ends_with("-notes.pdf"));
    }

    #[test]
    fn test_prefix_is_classroom_scoped() {
        let key = attachment_key(1, 2, "a.pdf");
        assert!(key.starts_with(&classroom_prefix(1)));
        assert!(!key.starts_with(&classroom_prefix(10)));
    }
}
