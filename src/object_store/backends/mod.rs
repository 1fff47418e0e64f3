pub mod local;
pub mod memory;

/// 拼接公开访问地址
pub(crate) fn join_public_url(base: &str, key: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), key)
}
