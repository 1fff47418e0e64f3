pub mod delete;
pub mod get;
pub mod review;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::submissions::requests::GradeSubmissionRequest;

use super::define_service;

define_service!(SubmissionService);

impl SubmissionService {
    pub async fn get_submission(
        &self,
        request: &HttpRequest,
        submission_id: i64,
    ) -> ActixResult<HttpResponse> {
        get::handle_get_submission(self, request, submission_id).await
    }

    // 教师查看提交
    pub async fn view_submission(
        &self,
        request: &HttpRequest,
        submission_id: i64,
    ) -> ActixResult<HttpResponse> {
        review::handle_view_submission(self, request, submission_id).await
    }

    pub async fn grade_submission(
        &self,
        request: &HttpRequest,
        submission_id: i64,
        body: GradeSubmissionRequest,
    ) -> ActixResult<HttpResponse> {
        review::handle_grade_submission(self, request, submission_id, body).await
    }

    pub async fn delete_submission(
        &self,
        request: &HttpRequest,
        submission_id: i64,
    ) -> ActixResult<HttpResponse> {
        delete::handle_delete_submission(self, request, submission_id).await
    }
}
