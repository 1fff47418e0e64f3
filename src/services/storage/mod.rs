//! 对象存储网关：上传与下载由附件、提交记录签发的对象键

pub mod download;
pub mod upload;

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::define_service;

define_service!(StorageService);

impl StorageService {
    pub async fn upload(
        &self,
        request: &HttpRequest,
        key: String,
        payload: Multipart,
    ) -> ActixResult<HttpResponse> {
        upload::handle_upload(self, request, key, payload).await
    }

    pub async fn download(&self, request: &HttpRequest, key: String) -> ActixResult<HttpResponse> {
        download::handle_download(self, request, key).await
    }

    // 公开访问，仅限头像
    pub async fn download_public(
        &self,
        request: &HttpRequest,
        key: String,
    ) -> ActixResult<HttpResponse> {
        download::handle_download_public(self, request, key).await
    }
}
