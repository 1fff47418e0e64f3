use serde::Serialize;

// 对象上传结果
#[derive(Debug, Serialize)]
pub struct ObjectUploadResponse {
    pub object_key: String,
    pub size: usize,
    /// 仅公开对象（头像）有访问地址
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}
